//! CLI argument parsing and command handling.

mod args;
pub mod help;
pub mod validators;

pub use args::{AnalyzeArgs, Cli, Command, ConfigAction, ModelsAction, SpeciesAction};
