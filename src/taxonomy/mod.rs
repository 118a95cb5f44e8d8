//! Label table and species reference data.

pub mod labels;
pub mod reference;

pub use labels::{LabelLookup, LabelTable};
pub use reference::{RecordField, ReferenceStore, SpeciesRecord};
