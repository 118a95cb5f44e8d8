//! Species reference data keyed by scientific name.
//!
//! The reference document is a JSON object mapping each species name to a
//! record of descriptive fields:
//!
//! ```json
//! {
//!   "Aedes aegypti": {
//!     "Kingdom": "Animalia",
//!     "Order": "Diptera",
//!     "Host Crops": "None (human disease vector)",
//!     "IPM Measures": ["Remove standing water", "Use bed nets"]
//!   }
//! }
//! ```
//!
//! Every field is optional. Missing fields render as a placeholder instead
//! of failing the lookup.

use crate::constants::placeholders;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Descriptive fields stored for each species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    /// Taxonomic kingdom.
    Kingdom,
    /// Taxonomic phylum.
    Phylum,
    /// Taxonomic class.
    Class,
    /// Taxonomic order.
    Order,
    /// Taxonomic family.
    Family,
    /// Taxonomic genus.
    Genus,
    /// Species epithet or full binomial.
    Species,
    /// Crops attacked by the pest.
    HostCrops,
    /// Visible damage on the host.
    DamageSymptoms,
    /// Integrated pest management practices.
    IpmMeasures,
    /// Chemical control recommendations.
    ChemicalControl,
}

impl RecordField {
    /// All fields in display order.
    pub const ALL: [Self; 11] = [
        Self::Kingdom,
        Self::Phylum,
        Self::Class,
        Self::Order,
        Self::Family,
        Self::Genus,
        Self::Species,
        Self::HostCrops,
        Self::DamageSymptoms,
        Self::IpmMeasures,
        Self::ChemicalControl,
    ];

    /// Taxonomy fields in rank order.
    pub const TAXONOMY: [Self; 7] = [
        Self::Kingdom,
        Self::Phylum,
        Self::Class,
        Self::Order,
        Self::Family,
        Self::Genus,
        Self::Species,
    ];

    /// Narrative fields shown as separate sections.
    pub const NARRATIVE: [Self; 4] = [
        Self::HostCrops,
        Self::DamageSymptoms,
        Self::IpmMeasures,
        Self::ChemicalControl,
    ];

    /// Key used in the reference document and in reports.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Kingdom => "Kingdom",
            Self::Phylum => "Phylum",
            Self::Class => "Class",
            Self::Order => "Order",
            Self::Family => "Family",
            Self::Genus => "Genus",
            Self::Species => "Species",
            Self::HostCrops => "Host Crops",
            Self::DamageSymptoms => "Damage Symptoms",
            Self::IpmMeasures => "IPM Measures",
            Self::ChemicalControl => "Chemical Control",
        }
    }

    /// Whether this is one of the taxonomy ranks.
    pub const fn is_taxonomy(self) -> bool {
        matches!(
            self,
            Self::Kingdom
                | Self::Phylum
                | Self::Class
                | Self::Order
                | Self::Family
                | Self::Genus
                | Self::Species
        )
    }

    /// Text shown when a record has no value for this field.
    pub const fn placeholder(self) -> &'static str {
        if self.is_taxonomy() {
            placeholders::TAXONOMY
        } else {
            placeholders::NARRATIVE
        }
    }
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Immutable reference record for one species.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SpeciesRecord {
    #[serde(rename = "Kingdom", default, deserialize_with = "text_field")]
    kingdom: Option<String>,
    #[serde(rename = "Phylum", default, deserialize_with = "text_field")]
    phylum: Option<String>,
    #[serde(rename = "Class", default, deserialize_with = "text_field")]
    class: Option<String>,
    #[serde(rename = "Order", default, deserialize_with = "text_field")]
    order: Option<String>,
    #[serde(rename = "Family", default, deserialize_with = "text_field")]
    family: Option<String>,
    #[serde(rename = "Genus", default, deserialize_with = "text_field")]
    genus: Option<String>,
    #[serde(rename = "Species", default, deserialize_with = "text_field")]
    species: Option<String>,
    #[serde(rename = "Host Crops", default, deserialize_with = "text_field")]
    host_crops: Option<String>,
    #[serde(rename = "Damage Symptoms", default, deserialize_with = "text_field")]
    damage_symptoms: Option<String>,
    #[serde(rename = "IPM Measures", default, deserialize_with = "text_field")]
    ipm_measures: Option<String>,
    #[serde(rename = "Chemical Control", default, deserialize_with = "text_field")]
    chemical_control: Option<String>,
}

impl SpeciesRecord {
    /// Stored value of a field, if any.
    pub fn get(&self, field: RecordField) -> Option<&str> {
        let value = match field {
            RecordField::Kingdom => &self.kingdom,
            RecordField::Phylum => &self.phylum,
            RecordField::Class => &self.class,
            RecordField::Order => &self.order,
            RecordField::Family => &self.family,
            RecordField::Genus => &self.genus,
            RecordField::Species => &self.species,
            RecordField::HostCrops => &self.host_crops,
            RecordField::DamageSymptoms => &self.damage_symptoms,
            RecordField::IpmMeasures => &self.ipm_measures,
            RecordField::ChemicalControl => &self.chemical_control,
        };
        value.as_deref()
    }

    /// Stored value of a field, or its placeholder.
    pub fn display(&self, field: RecordField) -> &str {
        self.get(field).unwrap_or_else(|| field.placeholder())
    }

    /// Builder-style setter, used when records are assembled in code.
    #[must_use]
    pub fn with(mut self, field: RecordField, value: impl Into<String>) -> Self {
        let slot = match field {
            RecordField::Kingdom => &mut self.kingdom,
            RecordField::Phylum => &mut self.phylum,
            RecordField::Class => &mut self.class,
            RecordField::Order => &mut self.order,
            RecordField::Family => &mut self.family,
            RecordField::Genus => &mut self.genus,
            RecordField::Species => &mut self.species,
            RecordField::HostCrops => &mut self.host_crops,
            RecordField::DamageSymptoms => &mut self.damage_symptoms,
            RecordField::IpmMeasures => &mut self.ipm_measures,
            RecordField::ChemicalControl => &mut self.chemical_control,
        };
        *slot = Some(value.into());
        self
    }
}

/// Accept strings, string arrays and scalars; only null counts as absent.
fn text_field<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

/// Stored text of a JSON value, kept verbatim.
fn value_to_text(value: serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(value_to_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

/// Static species name to record lookup, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    records: HashMap<String, SpeciesRecord>,
}

impl ReferenceStore {
    /// Build a store from in-memory records.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, SpeciesRecord)>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Parse a reference document from a JSON string.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let records: HashMap<String, SpeciesRecord> = serde_json::from_str(json)?;
        Ok(Self { records })
    }

    /// Load the reference document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ReferenceFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| Error::ReferenceRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let store = Self::from_json_str(&contents).map_err(|e| Error::ReferenceParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(
            "Loaded {} reference records from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Look up a species by exact name.
    pub fn get(&self, species: &str) -> Option<&SpeciesRecord> {
        self.records.get(species)
    }

    /// Whether a record exists for the species.
    pub fn contains(&self, species: &str) -> bool {
        self.records.contains_key(species)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Species names in sorted order.
    pub fn species(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.records.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "Aedes aegypti": {
            "Kingdom": "Animalia",
            "Phylum": "Arthropoda",
            "Class": "Insecta",
            "Order": "Diptera",
            "Family": "Culicidae",
            "Genus": "Aedes",
            "Species": "aegypti",
            "Host Crops": "None (vector of dengue and yellow fever)",
            "IPM Measures": ["Remove standing water", "Larvicides in containers"],
            "Unknown Field": 3
        },
        "Tuta absoluta": {
            "Order": "Lepidoptera",
            "Family": null,
            "Genus": " Tuta ",
            "Species": "",
            "Chemical Control": null
        }
    }"#;

    #[test]
    fn test_parse_full_record() {
        let store = ReferenceStore::from_json_str(SAMPLE).unwrap();
        assert_eq!(store.len(), 2);

        let record = store.get("Aedes aegypti").unwrap();
        assert_eq!(record.get(RecordField::Kingdom), Some("Animalia"));
        assert_eq!(record.get(RecordField::Family), Some("Culicidae"));
        assert_eq!(
            record.get(RecordField::IpmMeasures),
            Some("Remove standing water, Larvicides in containers")
        );
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let store = ReferenceStore::from_json_str(SAMPLE).unwrap();
        let record = store.get("Tuta absoluta").unwrap();

        assert_eq!(record.display(RecordField::Order), "Lepidoptera");
        assert_eq!(record.display(RecordField::Family), "N/A");
        assert_eq!(record.display(RecordField::Kingdom), "N/A");
        assert_eq!(record.display(RecordField::HostCrops), "Not available");
        assert_eq!(record.display(RecordField::ChemicalControl), "Not available");
    }

    #[test]
    fn test_stored_text_is_kept_verbatim() {
        let store = ReferenceStore::from_json_str(SAMPLE).unwrap();
        let record = store.get("Tuta absoluta").unwrap();

        assert_eq!(record.get(RecordField::Genus), Some(" Tuta "));
        assert_eq!(record.display(RecordField::Genus), " Tuta ");
        assert_eq!(record.get(RecordField::Species), Some(""));
        assert_eq!(record.display(RecordField::Species), "");
    }

    #[test]
    fn test_every_field_is_stored_value_or_placeholder() {
        let store = ReferenceStore::from_json_str(SAMPLE).unwrap();
        for name in store.species() {
            let record = store.get(name).unwrap();
            for field in RecordField::ALL {
                let shown = record.display(field);
                match record.get(field) {
                    Some(stored) => assert_eq!(shown, stored),
                    None => assert_eq!(shown, field.placeholder()),
                }
            }
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let store = ReferenceStore::from_json_str(SAMPLE).unwrap();
        assert!(store.contains("Aedes aegypti"));
        assert!(!store.contains("aedes aegypti"));
        assert!(store.get("Apis mellifera").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let store = ReferenceStore::from_file(file.path()).unwrap();
        assert_eq!(store.species(), vec!["Aedes aegypti", "Tuta absoluta"]);
    }

    #[test]
    fn test_missing_file() {
        let result = ReferenceStore::from_file(Path::new("/nonexistent/pest.json"));
        assert!(matches!(result, Err(Error::ReferenceFileNotFound { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = ReferenceStore::from_file(file.path());
        assert!(matches!(result, Err(Error::ReferenceParse { .. })));
    }

    #[test]
    fn test_record_builder() {
        let record = SpeciesRecord::default()
            .with(RecordField::Genus, "Apis")
            .with(RecordField::HostCrops, "Pollinator");
        assert_eq!(record.display(RecordField::Genus), "Apis");
        assert_eq!(record.display(RecordField::HostCrops), "Pollinator");
        assert_eq!(record.display(RecordField::Phylum), "N/A");
    }
}
