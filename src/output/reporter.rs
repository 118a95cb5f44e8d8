//! Result reporting for classification runs.
//!
//! A [`Reporter`] receives each finished image and the run summary, and
//! writes them in the selected output mode.

use crate::config::OutputMode;
use crate::error::Error;
use crate::output::json_envelope::{
    ClassificationPayload, EventType, FileErrorInfo, JsonEnvelope, ResultType, RunStatus,
};
use crate::output::{ClassificationEntry, render_report};
use crate::pipeline::ImageReport;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Summary of a classification run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Model used for the run.
    pub model: String,
    /// Files successfully processed.
    pub files_processed: usize,
    /// Files that failed.
    pub files_failed: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Trait for reporting classification results.
pub trait Reporter {
    /// Report a classified image.
    fn report(&self, report: &ImageReport);

    /// Report an image that could not be processed.
    fn failure(&self, file: &Path, error: &Error);

    /// Report run completion.
    fn finish(&self, summary: &RunSummary);
}

/// Human-readable reporter writing one block per image.
pub struct HumanReporter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl HumanReporter {
    /// Create a reporter writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a reporter with a custom writer.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write(&self, text: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            // Broken pipe is not worth aborting the run for
            let _ = writer.write_all(text.as_bytes());
            let _ = writer.flush();
        }
    }
}

impl Default for HumanReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for HumanReporter {
    fn report(&self, report: &ImageReport) {
        let mut text = render_report(report);
        text.push('\n');
        self.write(&text);
    }

    // Failures are already logged at error level.
    fn failure(&self, _file: &Path, _error: &Error) {}

    fn finish(&self, _summary: &RunSummary) {}
}

/// JSON reporter emitting a single enveloped document at the end of the run.
pub struct JsonReporter {
    writer: Mutex<Box<dyn Write + Send>>,
    results: Mutex<Vec<ClassificationEntry>>,
    failures: Mutex<Vec<FileErrorInfo>>,
}

impl JsonReporter {
    /// Create a reporter writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a reporter with a custom writer.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            results: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JsonReporter {
    fn report(&self, report: &ImageReport) {
        if let Ok(mut results) = self.results.lock() {
            results.push(ClassificationEntry::from(report));
        }
    }

    fn failure(&self, file: &Path, error: &Error) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(FileErrorInfo {
                file: file.to_path_buf(),
                code: error.code().to_string(),
                message: error.to_string(),
            });
        }
    }

    fn finish(&self, summary: &RunSummary) {
        let results = self
            .results
            .lock()
            .map(|mut r| std::mem::take(&mut *r))
            .unwrap_or_default();
        let failures = self
            .failures
            .lock()
            .map(|mut f| std::mem::take(&mut *f))
            .unwrap_or_default();

        let payload = ClassificationPayload {
            result_type: ResultType::Classification,
            model: summary.model.clone(),
            status: RunStatus::from_counts(summary.files_processed, summary.files_failed),
            files_processed: summary.files_processed,
            files_failed: summary.files_failed,
            duration_ms: summary.duration_ms,
            results,
            failures,
        };

        let envelope = JsonEnvelope::new(EventType::Result, payload);
        match serde_json::to_string_pretty(&envelope) {
            Ok(json) => {
                if let Ok(mut writer) = self.writer.lock() {
                    if let Err(e) = writeln!(writer, "{json}") {
                        eprintln!("insectifica: warning: failed to write to stdout: {e}");
                    }
                    let _ = writer.flush();
                }
            }
            Err(e) => eprintln!("error: failed to serialize JSON result: {e}"),
        }
    }
}

/// Create a reporter based on output mode.
pub fn create_reporter(mode: OutputMode) -> Box<dyn Reporter> {
    match mode {
        OutputMode::Human => Box::new(HumanReporter::new()),
        OutputMode::Json => Box::new(JsonReporter::new()),
    }
}
