//! Single image processing: decode, infer, look up.

use crate::constants::messages;
use crate::error::Result;
use crate::imaging::decode_image;
use crate::inference::{InsectClassifier, Prediction};
use crate::taxonomy::{LabelLookup, LabelTable, ReferenceStore, SpeciesRecord};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Final classification outcome for one image.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Species recognized and reference details found.
    Identified {
        /// Predicted species name.
        species: String,
        /// Prediction confidence (0.0 - 1.0).
        confidence: f32,
        /// Reference record for the species.
        record: SpeciesRecord,
    },
    /// Species recognized but missing from the reference data.
    DetailsUnavailable {
        /// Predicted species name.
        species: String,
        /// Prediction confidence (0.0 - 1.0).
        confidence: f32,
    },
    /// Predicted index has no label.
    Unclassifiable {
        /// Model output index that fell outside the label table.
        index: usize,
        /// Prediction confidence (0.0 - 1.0).
        confidence: f32,
    },
}

impl Outcome {
    /// Predicted species name, if the index mapped to a label.
    pub fn species(&self) -> Option<&str> {
        match self {
            Self::Identified { species, .. } | Self::DetailsUnavailable { species, .. } => {
                Some(species.as_str())
            }
            Self::Unclassifiable { .. } => None,
        }
    }

    /// Prediction confidence.
    pub fn confidence(&self) -> f32 {
        match self {
            Self::Identified { confidence, .. }
            | Self::DetailsUnavailable { confidence, .. }
            | Self::Unclassifiable { confidence, .. } => *confidence,
        }
    }

    /// User-facing message for outcomes that carry no reference details.
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Identified { .. } => None,
            Self::DetailsUnavailable { .. } => Some(messages::DETAILS_UNAVAILABLE),
            Self::Unclassifiable { .. } => Some(messages::UNCLASSIFIABLE),
        }
    }

    /// Short status identifier for machine-readable output.
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Identified { .. } => "identified",
            Self::DetailsUnavailable { .. } => "details_unavailable",
            Self::Unclassifiable { .. } => "unclassifiable",
        }
    }
}

/// A ranked alternative resolved against the label table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSpecies {
    /// Model output index.
    pub index: usize,
    /// Label, if the index is within the table.
    pub species: Option<String>,
    /// Prediction confidence (0.0 - 1.0).
    pub confidence: f32,
}

/// Everything reported for one image.
#[derive(Debug, Clone)]
pub struct ImageReport {
    /// Source image path.
    pub file: PathBuf,
    /// Predicted class index.
    pub index: usize,
    /// Classification outcome.
    pub outcome: Outcome,
    /// Ranked predictions, best first.
    pub ranked: Vec<RankedSpecies>,
    /// Wall time spent on this image in milliseconds.
    pub duration_ms: u64,
}

/// Map a prediction through the label table and reference store.
pub fn classify(
    prediction: &Prediction,
    labels: &LabelTable,
    reference: &ReferenceStore,
) -> Outcome {
    let confidence = prediction.confidence;

    match labels.get(prediction.index) {
        LabelLookup::OutOfRange { index, len } => {
            debug!("Predicted index {index} outside label table of {len}");
            Outcome::Unclassifiable { index, confidence }
        }
        LabelLookup::Found(species) => reference.get(species).map_or_else(
            || Outcome::DetailsUnavailable {
                species: species.to_string(),
                confidence,
            },
            |record| Outcome::Identified {
                species: species.to_string(),
                confidence,
                record: record.clone(),
            },
        ),
    }
}

/// Resolve ranked predictions to label names.
pub fn rank_species(prediction: &Prediction, labels: &LabelTable) -> Vec<RankedSpecies> {
    prediction
        .ranked
        .iter()
        .map(|r| RankedSpecies {
            index: r.index,
            species: match labels.get(r.index) {
                LabelLookup::Found(name) => Some(name.to_string()),
                LabelLookup::OutOfRange { .. } => None,
            },
            confidence: r.confidence,
        })
        .collect()
}

/// Decode, classify and look up a single image.
pub fn process_image(
    path: &Path,
    classifier: &InsectClassifier,
    labels: &LabelTable,
    reference: &ReferenceStore,
) -> Result<ImageReport> {
    let start = Instant::now();
    info!("Processing: {}", path.display());

    let image = decode_image(path)?;
    let prediction = classifier.infer(&image)?;
    let outcome = classify(&prediction, labels, reference);
    let ranked = rank_species(&prediction, labels);

    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = start.elapsed().as_millis() as u64;

    debug!(
        "{}: index {} ({}) in {} ms",
        path.display(),
        prediction.index,
        outcome.status(),
        duration_ms
    );

    Ok(ImageReport {
        file: path.to_path_buf(),
        index: prediction.index,
        outcome,
        ranked,
        duration_ms,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;
    use crate::inference::decide;
    use crate::taxonomy::RecordField;

    fn labels() -> LabelTable {
        LabelTable::new(["Apis mellifera", "Tuta absoluta", "Aedes aegypti"], "test").unwrap()
    }

    fn reference() -> ReferenceStore {
        ReferenceStore::from_records([(
            "Apis mellifera".to_string(),
            SpeciesRecord::default().with(RecordField::Order, "Hymenoptera"),
        )])
    }

    #[test]
    fn test_classify_identified() {
        let prediction = decide(&[0.9, 0.05, 0.05], 1).unwrap();
        let outcome = classify(&prediction, &labels(), &reference());

        match outcome {
            Outcome::Identified {
                species,
                confidence,
                record,
            } => {
                assert_eq!(species, "Apis mellifera");
                assert_eq!(confidence, 0.9);
                assert_eq!(record.display(RecordField::Order), "Hymenoptera");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_classify_details_unavailable() {
        let prediction = decide(&[0.1, 0.8, 0.1], 1).unwrap();
        let outcome = classify(&prediction, &labels(), &reference());
        assert_eq!(
            outcome,
            Outcome::DetailsUnavailable {
                species: "Tuta absoluta".to_string(),
                confidence: 0.8
            }
        );
        assert_eq!(outcome.status(), "details_unavailable");
    }

    #[test]
    fn test_classify_out_of_range_is_not_a_fault() {
        // Model has one more class than the label table.
        let prediction = decide(&[0.1, 0.1, 0.1, 0.7], 2).unwrap();
        let outcome = classify(&prediction, &labels(), &reference());
        assert_eq!(
            outcome,
            Outcome::Unclassifiable {
                index: 3,
                confidence: 0.7
            }
        );
        assert!(outcome.species().is_none());

        let ranked = rank_species(&prediction, &labels());
        assert_eq!(ranked[0].species, None);
        assert_eq!(ranked[1].species.as_deref(), Some("Apis mellifera"));
    }
}
