//! CLI argument definitions.

use crate::cli::validators::{parse_input_size, parse_top_k};
use crate::config::{OutputActivation, OutputMode};
use crate::imaging::{Normalization, TensorLayout};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Insect pest identification from photographs.
#[derive(Debug, Parser)]
#[command(name = "insectifica")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image files or directories to classify.
    pub inputs: Vec<PathBuf>,

    /// Common options for classification.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage models.
    Models {
        /// Models action to perform.
        #[command(subcommand)]
        action: ModelsAction,
    },
    /// Browse the label table and reference data.
    Species {
        /// Species action to perform.
        #[command(subcommand)]
        action: SpeciesAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Models subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ModelsAction {
    /// List configured models.
    List,
    /// Add a new model to configuration.
    Add {
        /// Name for this model (e.g., "mobilenetv2").
        name: String,
        /// Path to the ONNX model file.
        #[arg(long)]
        path: PathBuf,
        /// Path to the labels file (bundled labels when omitted).
        #[arg(long)]
        labels: Option<PathBuf>,
        /// Square input size in pixels.
        #[arg(long, value_parser = parse_input_size)]
        size: Option<u32>,
        /// Pixel normalization expected by the model.
        #[arg(long, value_enum)]
        normalization: Option<Normalization>,
        /// Input tensor layout.
        #[arg(long, value_enum)]
        layout: Option<TensorLayout>,
        /// Whether the model outputs probabilities or raw logits.
        #[arg(long, value_enum)]
        activation: Option<OutputActivation>,
        /// Set as the default model.
        #[arg(long)]
        default: bool,
    },
    /// Verify model, labels and reference files exist.
    Check,
    /// Show details for a configured model.
    Info {
        /// Model name from configuration.
        name: String,
    },
}

/// Species subcommand actions.
#[derive(Debug, Subcommand)]
pub enum SpeciesAction {
    /// List the label table in model output order.
    List,
    /// Show the reference record for a species.
    Show {
        /// Species name as it appears in the label table.
        name: String,
    },
}

/// Arguments for classification.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Model name from configuration.
    #[arg(short, long, global = true, env = "INSECTIFICA_MODEL")]
    pub model: Option<String>,

    /// Path to ONNX model file (overrides config).
    #[arg(long, env = "INSECTIFICA_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Path to labels file (overrides config).
    #[arg(long, global = true, env = "INSECTIFICA_LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Path to the species reference JSON (overrides config).
    #[arg(long, global = true, env = "INSECTIFICA_REFERENCE")]
    pub reference: Option<PathBuf>,

    /// Number of ranked predictions to report (1-20).
    #[arg(short = 'k', long, value_parser = parse_top_k)]
    pub top_k: Option<usize>,

    /// Output mode.
    #[arg(long, global = true, value_enum)]
    pub output_mode: Option<OutputMode>,

    /// Also write a CSV results table to this file.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Suppress progress and informational output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: trace+ORT debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Enable CUDA GPU acceleration.
    #[arg(long, conflicts_with = "cpu")]
    pub gpu: bool,

    /// Force CPU inference.
    #[arg(long, conflicts_with = "gpu")]
    pub cpu: bool,
}
