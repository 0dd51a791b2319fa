use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A data row that could not be converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    /// Zero-based data row index (the header line is not counted)
    pub row_index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub encoding: Option<String>,
    pub delimiter: Option<char>,
    pub rows_total: usize,
    pub rows_succeeded: usize,
    pub rows_failed: usize,
    pub output_path: Option<PathBuf>,
    /// Set when the whole file failed
    pub error: Option<String>,
    pub failures: Vec<RowFailure>,
}

impl FileReport {
    pub fn new(source: PathBuf) -> Self {
        Self {
            source,
            encoding: None,
            delimiter: None,
            rows_total: 0,
            rows_succeeded: 0,
            rows_failed: 0,
            output_path: None,
            error: None,
            failures: Vec::new(),
        }
    }

    pub fn failed(source: PathBuf, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(source)
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.output_path.is_some()
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub files_succeeded: usize,
    pub files_failed: usize,
}

impl BatchReport {
    pub fn from_files(files: Vec<FileReport>) -> Self {
        let files_succeeded = files.iter().filter(|f| f.is_success()).count();
        let files_failed = files.len() - files_succeeded;
        Self {
            files,
            files_succeeded,
            files_failed,
        }
    }

    pub fn rows_total(&self) -> usize {
        self.files.iter().map(|f| f.rows_total).sum()
    }

    pub fn rows_succeeded(&self) -> usize {
        self.files.iter().map(|f| f.rows_succeeded).sum()
    }

    pub fn rows_failed(&self) -> usize {
        self.files.iter().map(|f| f.rows_failed).sum()
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Conversion Report ===\n");
        summary.push_str(&format!("Files: {}\n", self.files.len()));
        summary.push_str(&format!("Files Converted: {}\n", self.files_succeeded));
        summary.push_str(&format!("Files Failed: {}\n", self.files_failed));

        let rows_total = self.rows_total();
        let percent = |count: usize| {
            if rows_total == 0 {
                0.0
            } else {
                100.0 * count as f64 / rows_total as f64
            }
        };
        summary.push_str(&format!("Data Rows: {}\n", rows_total));
        summary.push_str(&format!(
            "Rows Converted: {} ({:.1}%)\n",
            self.rows_succeeded(),
            percent(self.rows_succeeded())
        ));
        summary.push_str(&format!(
            "Rows Skipped: {} ({:.1}%)\n",
            self.rows_failed(),
            percent(self.rows_failed())
        ));

        for file in &self.files {
            summary.push('\n');
            match (&file.error, &file.output_path) {
                (Some(error), _) => {
                    summary.push_str(&format!("  ✗ {}: {}\n", file.file_name(), error));
                }
                (None, Some(output)) => {
                    summary.push_str(&format!(
                        "  ✓ {} -> {} ({}/{} rows)\n",
                        file.file_name(),
                        output.display(),
                        file.rows_succeeded,
                        file.rows_total
                    ));
                }
                (None, None) => {
                    summary.push_str(&format!("  ? {}: not written\n", file.file_name()));
                }
            }

            for failure in file.failures.iter().take(5) {
                summary.push_str(&format!(
                    "      row {}: {}\n",
                    failure.row_index + 1,
                    failure.reason
                ));
            }
            if file.failures.len() > 5 {
                summary.push_str(&format!(
                    "      ... and {} more\n",
                    file.failures.len() - 5
                ));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converted_file(name: &str, total: usize, failed: usize) -> FileReport {
        FileReport {
            rows_total: total,
            rows_succeeded: total - failed,
            rows_failed: failed,
            output_path: Some(PathBuf::from(format!("out/{}_convertido.csv", name))),
            failures: (0..failed)
                .map(|i| RowFailure {
                    row_index: i + 1,
                    reason: "empty value".to_string(),
                })
                .collect(),
            ..FileReport::new(PathBuf::from(format!("in/{}.csv", name)))
        }
    }

    #[test]
    fn test_batch_totals() {
        let report = BatchReport::from_files(vec![
            converted_file("a", 10, 2),
            converted_file("b", 5, 0),
            FileReport::failed(PathBuf::from("in/c.csv"), "no encoding matched"),
        ]);

        assert_eq!(report.files_succeeded, 2);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.rows_total(), 15);
        assert_eq!(report.rows_succeeded(), 13);
        assert_eq!(report.rows_failed(), 2);
    }

    #[test]
    fn test_summary_mentions_failures() {
        let report = BatchReport::from_files(vec![
            converted_file("a", 10, 7),
            FileReport::failed(PathBuf::from("in/c.csv"), "no encoding matched"),
        ]);
        let summary = report.summary();

        assert!(summary.contains("Files Converted: 1"));
        assert!(summary.contains("Files Failed: 1"));
        assert!(summary.contains("c.csv: no encoding matched"));
        assert!(summary.contains("row 2: empty value"));
        assert!(summary.contains("... and 2 more"));
    }

    #[test]
    fn test_empty_batch_summary() {
        let summary = BatchReport::default().summary();
        assert!(summary.contains("Rows Converted: 0 (0.0%)"));
    }
}
