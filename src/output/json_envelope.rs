//! JSON envelope types for CLI output.
//!
//! Every JSON document written to stdout is wrapped in a [`JsonEnvelope`]
//! so consumers can dispatch on `event` and check `spec_version`.

use crate::output::ClassificationEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Current spec version for JSON envelope.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct JsonEnvelope<T> {
    /// API specification version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Final result.
    Result,
    /// Error occurred.
    Error,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Image classification results.
    Classification,
    /// Model list.
    ModelList,
    /// Model information.
    ModelInfo,
    /// Label table listing.
    SpeciesList,
    /// A single reference record.
    SpeciesInfo,
    /// Configuration display.
    Config,
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Error code (`snake_case` identifier).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Run completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// All files processed successfully.
    Success,
    /// Some files failed.
    PartialSuccess,
    /// No file could be processed.
    Failed,
}

impl RunStatus {
    /// Derive status from processed/failed counts.
    pub const fn from_counts(processed: usize, failed: usize) -> Self {
        if failed == 0 {
            Self::Success
        } else if processed > 0 {
            Self::PartialSuccess
        } else {
            Self::Failed
        }
    }
}

/// Error information for a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileErrorInfo {
    /// File path.
    pub file: PathBuf,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

/// Payload for a classification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Model used for the run.
    pub model: String,
    /// Overall status.
    pub status: RunStatus,
    /// Files successfully processed.
    pub files_processed: usize,
    /// Files that failed.
    pub files_failed: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Per-image results.
    pub results: Vec<ClassificationEntry>,
    /// Per-image failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FileErrorInfo>,
}

/// Payload for model list result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// List of configured models.
    pub models: Vec<ModelEntry>,
}

/// A single model entry in the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model identifier/name.
    pub id: String,
    /// Whether this is the default model.
    pub is_default: bool,
    /// Path to the model file.
    pub path: PathBuf,
    /// Path to the labels file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_path: Option<PathBuf>,
    /// Square input edge in pixels.
    pub input_size: u32,
}

/// Payload for model info result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Model identifier/name.
    pub id: String,
    /// Path to the model file.
    pub path: PathBuf,
    /// Path to the labels file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_path: Option<PathBuf>,
    /// Square input edge in pixels.
    pub input_size: u32,
    /// Pixel normalization.
    pub normalization: String,
    /// Tensor layout.
    pub layout: String,
    /// Output activation.
    pub activation: String,
    /// Whether the model file exists.
    pub model_exists: bool,
}

/// Payload for species list result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesListPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Number of labels.
    pub species_count: usize,
    /// Labels in model output order.
    pub species: Vec<SpeciesEntry>,
}

/// A single label table entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesEntry {
    /// Model output index.
    pub index: usize,
    /// Species name.
    pub name: String,
    /// Whether the reference store has a record for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_details: Option<bool>,
}

/// Payload for species info result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesInfoPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Species name.
    pub name: String,
    /// Reference record fields.
    pub details: std::collections::BTreeMap<String, String>,
}

/// Payload for config show result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// The configuration contents (as JSON value for flexibility).
    pub config: serde_json::Value,
}

/// Emit a JSON result event to stdout.
///
/// Used by command handlers when running in JSON output mode.
pub fn emit_json_result<T: Serialize>(payload: &T) {
    emit(EventType::Result, payload);
}

/// Emit a JSON error event to stdout.
pub fn emit_json_error(code: &str, message: &str) {
    emit(
        EventType::Error,
        &ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
        },
    );
}

fn emit<T: Serialize>(event: EventType, payload: &T) {
    let envelope = JsonEnvelope::new(event, payload);
    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            // stderr keeps the stdout document parseable
            eprintln!("error: failed to serialize JSON result: {e}");
        }
    }
}
