use crate::error::{ConversionError, Result};
use crate::models::{BatchReport, FileReport, OutputMode, ProjectionConfig, RowFailure, RowOutcome};
use crate::processors::row_converter::{build_output_table, RowConverter};
use crate::readers::{ColumnSelector, TableLoader};
use crate::utils::constants::{
    DEFAULT_INPUT_EXTENSION, DEFAULT_OUTPUT_DELIMITER, DEFAULT_OUTPUT_SUFFIX,
};
use crate::utils::filename::{has_extension, output_path_for};
use crate::utils::progress::ProgressReporter;
use crate::writers::TableWriter;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Parameters of one batch run, as supplied by the CLI or any other front end.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub x_column: ColumnSelector,
    pub y_column: ColumnSelector,
    pub mode: OutputMode,
}

impl BatchRequest {
    /// Checks that need no file access; failures abort the run up front.
    pub fn validate(&self) -> Result<()> {
        self.x_column.validate()?;
        self.y_column.validate()?;

        if !self.source_dir.is_dir() {
            return Err(ConversionError::Config(format!(
                "source directory does not exist: {}",
                self.source_dir.display()
            )));
        }
        if self.destination_dir.as_os_str().is_empty() {
            return Err(ConversionError::Config(
                "destination directory is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// One input file and where its converted table goes. Tasks share nothing
/// and can run on any worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    pub output: PathBuf,
}

pub struct BatchConverter {
    converter: RowConverter,
    loader: TableLoader,
    max_workers: usize,
    output_delimiter: u8,
    output_suffix: String,
    input_extension: String,
}

impl BatchConverter {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            converter: RowConverter::new(config),
            loader: TableLoader::new(),
            max_workers: num_cpus::get(),
            output_delimiter: DEFAULT_OUTPUT_DELIMITER,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            input_extension: DEFAULT_INPUT_EXTENSION.to_string(),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_output_delimiter(mut self, delimiter: u8) -> Self {
        self.output_delimiter = delimiter;
        self
    }

    pub fn with_output_suffix(mut self, suffix: &str) -> Self {
        self.output_suffix = suffix.to_string();
        self
    }

    pub fn with_input_extension(mut self, extension: &str) -> Self {
        self.input_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_row_converter(mut self, converter: RowConverter) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_loader(mut self, loader: TableLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Matching input files in the source directory, sorted by name
    pub fn discover_tasks(&self, source_dir: &Path, destination_dir: &Path) -> Result<Vec<FileTask>> {
        let mut sources = Vec::new();
        for entry in std::fs::read_dir(source_dir)? {
            let path = entry?.path();
            if path.is_file() && has_extension(&path, &self.input_extension) {
                sources.push(path);
            }
        }
        sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(sources
            .into_iter()
            .map(|source| FileTask {
                output: output_path_for(&source, destination_dir, &self.output_suffix),
                source,
            })
            .collect())
    }

    /// Convert every input file of the request. Failed files are recorded in
    /// the report; only invalid parameters return an error.
    pub fn run(&self, request: &BatchRequest, progress: &ProgressReporter) -> Result<BatchReport> {
        request.validate()?;
        if self.max_workers == 0 {
            return Err(ConversionError::Config(
                "max workers must be at least 1".to_string(),
            ));
        }

        let tasks = self.discover_tasks(&request.source_dir, &request.destination_dir)?;
        info!(
            "Converting {} file(s) from {} with {} worker(s)",
            tasks.len(),
            request.source_dir.display(),
            self.max_workers
        );
        progress.set_message(&format!("Converting {} files...", tasks.len()));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ConversionError::Config(e.to_string()))?;

        let collisions = find_output_collisions(&tasks);

        let files: Vec<FileReport> = pool.install(|| {
            tasks
                .par_iter()
                .enumerate()
                .map(|(index, task)| {
                    let report = match collisions.get(&index) {
                        Some(first) => {
                            let error = ConversionError::output_write(
                                &task.output,
                                format!("output already produced from {}", first.display()),
                            );
                            warn!("Skipping file {}: {}", task.source.display(), error);
                            FileReport::failed(task.source.clone(), error)
                        }
                        None => self.process_task(task, request),
                    };
                    progress.file_done(&report);
                    report
                })
                .collect()
        });

        let report = BatchReport::from_files(files);
        info!(
            "Batch finished: {} file(s) converted, {} failed, {} of {} rows converted",
            report.files_succeeded,
            report.files_failed,
            report.rows_succeeded(),
            report.rows_total()
        );
        progress.finish(&report);

        Ok(report)
    }

    /// Convert a single file. Never fails: file-level errors end up in the report.
    pub fn process_task(&self, task: &FileTask, request: &BatchRequest) -> FileReport {
        match self.try_process_task(task, request) {
            Ok(report) => report,
            Err(e) => {
                warn!("Skipping file {}: {}", task.source.display(), e);
                FileReport::failed(task.source.clone(), e)
            }
        }
    }

    fn try_process_task(&self, task: &FileTask, request: &BatchRequest) -> Result<FileReport> {
        let loaded = self.loader.load(&task.source)?;
        let table = &loaded.table;
        info!(
            "Loaded {} ({} rows, encoding {}, separator '{}')",
            task.source.display(),
            table.row_count(),
            loaded.encoding,
            loaded.separator
        );

        let x_col = request.x_column.resolve(&table.headers)?;
        let y_col = request.y_column.resolve(&table.headers)?;
        if x_col == y_col {
            return Err(ConversionError::Column(format!(
                "X and Y both resolve to column {}",
                x_col
            )));
        }

        let outcomes = self.converter.convert_table(table, x_col, y_col);

        let mut report = FileReport::new(task.source.clone());
        report.encoding = Some(loaded.encoding.label().to_string());
        report.delimiter = Some(loaded.separator.as_char());

        for (row_index, outcome) in outcomes.iter().enumerate() {
            match outcome {
                RowOutcome::Header => {}
                RowOutcome::Converted(_) => {
                    report.rows_total += 1;
                    report.rows_succeeded += 1;
                }
                RowOutcome::Skipped { reason } => {
                    warn!(
                        "{}: row {} skipped: {}",
                        task.source.display(),
                        row_index + 1,
                        reason
                    );
                    report.rows_total += 1;
                    report.rows_failed += 1;
                    report.failures.push(RowFailure {
                        row_index,
                        reason: reason.clone(),
                    });
                }
            }
        }

        let output = build_output_table(table, &outcomes, request.mode, x_col, y_col)?;
        TableWriter::new()
            .with_delimiter(self.output_delimiter)
            .write(&output, &task.output)?;

        info!(
            "Wrote {} ({}/{} rows converted)",
            task.output.display(),
            report.rows_succeeded,
            report.rows_total
        );
        report.output_path = Some(task.output.clone());

        Ok(report)
    }
}

impl Default for BatchConverter {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

/// Tasks whose output path was already claimed by an earlier task (e.g.
/// `a.csv` and `a.CSV`), mapped to the source of the earlier task.
fn find_output_collisions(tasks: &[FileTask]) -> HashMap<usize, PathBuf> {
    let mut claimed: HashMap<&Path, &Path> = HashMap::new();
    let mut collisions = HashMap::new();

    for (index, task) in tasks.iter().enumerate() {
        match claimed.get(task.output.as_path()) {
            Some(first) => {
                collisions.insert(index, first.to_path_buf());
            }
            None => {
                claimed.insert(task.output.as_path(), task.source.as_path());
            }
        }
    }

    collisions
}

/// Batch entry point: convert every table in `request.source_dir` with
/// default options and no progress output.
pub fn convert_directory(config: ProjectionConfig, request: &BatchRequest) -> Result<BatchReport> {
    BatchConverter::new(config).run(request, &ProgressReporter::silent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(source: &Path, destination: &Path, mode: OutputMode) -> BatchRequest {
        BatchRequest {
            source_dir: source.to_path_buf(),
            destination_dir: destination.to_path_buf(),
            x_column: ColumnSelector::letter("B"),
            y_column: ColumnSelector::letter("D"),
            mode,
        }
    }

    #[test]
    fn test_discover_tasks_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.csv"), "").unwrap();
        fs::write(temp_dir.path().join("a.CSV"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp_dir.path().join("dir.csv")).unwrap();

        let converter = BatchConverter::default();
        let tasks = converter
            .discover_tasks(temp_dir.path(), Path::new("out"))
            .unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].source.file_name().unwrap(), "a.CSV");
        assert_eq!(tasks[0].output, Path::new("out").join("a_convertido.csv"));
        assert_eq!(tasks[1].source.file_name().unwrap(), "b.csv");
    }

    #[test]
    fn test_empty_designator_rejected_before_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut request = request(temp_dir.path(), &temp_dir.path().join("out"), OutputMode::Append);
        request.x_column = ColumnSelector::letter("");

        let result = BatchConverter::default().run(&request, &ProgressReporter::silent());
        assert!(matches!(result, Err(ConversionError::Config(_))));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_missing_source_dir_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let request = request(
            &temp_dir.path().join("missing"),
            &temp_dir.path().join("out"),
            OutputMode::Append,
        );
        assert!(convert_directory(ProjectionConfig::default(), &request).is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let request = request(temp_dir.path(), &temp_dir.path().join("out"), OutputMode::Append);
        let result = BatchConverter::default()
            .with_max_workers(0)
            .run(&request, &ProgressReporter::silent());
        assert!(result.is_err());
    }

    #[test]
    fn test_same_column_for_x_and_y_fails_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("csv");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.csv"), "A;B;C;D\nh;h;h;h\n1;500000;2;7000000\n").unwrap();

        let mut request = request(&source, &temp_dir.path().join("out"), OutputMode::InPlace);
        request.y_column = ColumnSelector::letter("B");

        let report = convert_directory(ProjectionConfig::default(), &request).unwrap();
        assert_eq!(report.files_failed, 1);
        assert!(report.files[0].error.as_deref().unwrap().contains("column 1"));
    }

    #[test]
    fn test_row_counts_exclude_header_row() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("csv");
        fs::create_dir(&source).unwrap();
        fs::write(
            source.join("a.csv"),
            "Vertice;E/Long;Sigma;N/Lat\nunits;m;m;m\nP1;500000;0,1;7000000\nP2;;0,1;7000000\n",
        )
        .unwrap();

        let request = request(&source, &temp_dir.path().join("out"), OutputMode::Append);
        let report = BatchConverter::default()
            .with_max_workers(1)
            .run(&request, &ProgressReporter::silent())
            .unwrap();

        let file = &report.files[0];
        assert_eq!(file.rows_total, 2);
        assert_eq!(file.rows_succeeded, 1);
        assert_eq!(file.rows_failed, 1);
        assert_eq!(
            file.failures,
            vec![RowFailure {
                row_index: 2,
                reason: "empty value".to_string()
            }]
        );
        assert_eq!(file.encoding.as_deref(), Some("utf-8"));
        assert_eq!(file.delimiter, Some(';'));
    }

    #[test]
    fn test_colliding_outputs_fail_the_later_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("csv");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("a.CSV"), "A;B;C;D\nh;h;h;h\nUPPER;500000;-;7000000\n").unwrap();
        fs::write(source.join("a.csv"), "A;B;C;D\nh;h;h;h\nlower;500000;-;7000000\n").unwrap();

        let request = request(&source, &temp_dir.path().join("out"), OutputMode::Append);
        let report = BatchConverter::default()
            .with_max_workers(1)
            .run(&request, &ProgressReporter::silent())
            .unwrap();

        assert_eq!(report.files_succeeded, 1);
        assert_eq!(report.files_failed, 1);
        assert!(report.files[0].is_success());
        let error = report.files[1].error.as_deref().unwrap();
        assert!(error.contains("already produced from"));
        assert!(error.contains("a.CSV"));

        let written = fs::read_to_string(temp_dir.path().join("out").join("a_convertido.csv")).unwrap();
        assert!(written.contains("UPPER"));
        assert!(!written.contains("lower"));
    }
}
