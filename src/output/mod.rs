//! Report rendering and output writers.

mod csv;
mod human;
pub mod json_envelope;
pub mod progress;
mod reporter;
mod types;

pub use csv::CsvResultWriter;
pub use human::{render_record, render_report};
pub use json_envelope::{emit_json_error, emit_json_result};
pub use reporter::{HumanReporter, JsonReporter, Reporter, RunSummary, create_reporter};
pub use types::{ClassificationEntry, RankedEntry, format_percent, record_fields};
