//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::collect_input_files;
pub use processor::{ImageReport, Outcome, RankedSpecies, classify, process_image, rank_species};
