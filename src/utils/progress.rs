use crate::models::{BatchReport, FileReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Per-file progress bar for a batch run. Silent reporters do nothing.
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(total_files: u64, message: &str, silent: bool) -> Self {
        if silent {
            return Self::silent();
        }

        let pb = ProgressBar::new(total_files);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: Some(pb),
        }
    }

    pub fn silent() -> Self {
        Self { progress_bar: None }
    }

    pub fn is_silent(&self) -> bool {
        self.progress_bar.is_none()
    }

    /// Advance by one file and show its outcome above the bar
    pub fn file_done(&self, report: &FileReport) {
        if let Some(ref pb) = self.progress_bar {
            let line = match &report.error {
                Some(error) => format!("✗ {}: {}", report.file_name(), error),
                None => format!(
                    "✓ {} ({}/{} rows)",
                    report.file_name(),
                    report.rows_succeeded,
                    report.rows_total
                ),
            };
            pb.println(line);
            pb.inc(1);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    pub fn finish(&self, report: &BatchReport) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!(
                "Converted {} of {} files",
                report.files_succeeded,
                report.files.len()
            ));
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
