//! Output type definitions.

use crate::constants::confidence::PERCENT_DECIMAL_PLACES;
use crate::pipeline::{ImageReport, Outcome, RankedSpecies};
use crate::taxonomy::{RecordField, SpeciesRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Format a confidence value (0.0 - 1.0) as a percentage, e.g. `92.0%`.
pub fn format_percent(confidence: f32) -> String {
    format!(
        "{:.decimals$}%",
        confidence * 100.0,
        decimals = PERCENT_DECIMAL_PLACES
    )
}

/// Serializable view of a species record with placeholders filled in.
///
/// Keys match the reference document so JSON output can be fed back into
/// tools that read that format.
pub fn record_fields(record: &SpeciesRecord) -> BTreeMap<String, String> {
    RecordField::ALL
        .iter()
        .map(|&field| (field.key().to_string(), record.display(field).to_string()))
        .collect()
}

/// One ranked prediction in machine-readable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Model output index.
    pub index: usize,
    /// Label, absent when the index is outside the label table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    /// Prediction confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl From<&RankedSpecies> for RankedEntry {
    fn from(ranked: &RankedSpecies) -> Self {
        Self {
            index: ranked.index,
            species: ranked.species.clone(),
            confidence: ranked.confidence,
        }
    }
}

/// Classification result for one image in machine-readable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationEntry {
    /// Source image path.
    pub file: PathBuf,
    /// Outcome identifier (`identified`, `details_unavailable`, `unclassifiable`).
    pub status: String,
    /// Predicted class index.
    pub index: usize,
    /// Predicted species name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    /// Prediction confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Confidence formatted for display.
    pub confidence_display: String,
    /// User-facing message for outcomes without details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Reference record fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
    /// Ranked predictions, best first.
    pub ranked: Vec<RankedEntry>,
    /// Processing time in milliseconds.
    pub duration_ms: u64,
}

impl From<&ImageReport> for ClassificationEntry {
    fn from(report: &ImageReport) -> Self {
        let details = match &report.outcome {
            Outcome::Identified { record, .. } => Some(record_fields(record)),
            _ => None,
        };

        Self {
            file: report.file.clone(),
            status: report.outcome.status().to_string(),
            index: report.index,
            species: report.outcome.species().map(ToString::to_string),
            confidence: report.outcome.confidence(),
            confidence_display: format_percent(report.outcome.confidence()),
            message: report.outcome.message().map(ToString::to_string),
            details,
            ranked: report.ranked.iter().map(RankedEntry::from).collect(),
            duration_ms: report.duration_ms,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::messages;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.92), "92.0%");
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(0.123_45), "12.3%");
    }

    #[test]
    fn test_record_fields_fill_placeholders() {
        let record = SpeciesRecord::default().with(RecordField::Genus, "Aedes");
        let fields = record_fields(&record);

        assert_eq!(fields.len(), RecordField::ALL.len());
        assert_eq!(fields["Genus"], "Aedes");
        assert_eq!(fields["Family"], "N/A");
        assert_eq!(fields["IPM Measures"], "Not available");
    }

    #[test]
    fn test_entry_from_unclassifiable_report() {
        let report = ImageReport {
            file: PathBuf::from("bug.jpg"),
            index: 200,
            outcome: Outcome::Unclassifiable {
                index: 200,
                confidence: 0.5,
            },
            ranked: vec![RankedSpecies {
                index: 200,
                species: None,
                confidence: 0.5,
            }],
            duration_ms: 12,
        };

        let entry = ClassificationEntry::from(&report);
        assert_eq!(entry.status, "unclassifiable");
        assert!(entry.species.is_none());
        assert!(entry.details.is_none());
        assert_eq!(entry.message.as_deref(), Some(messages::UNCLASSIFIABLE));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"confidence_display\":\"50.0%\""));
        assert!(!json.contains("\"species\""));
    }
}
