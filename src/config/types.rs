//! Configuration type definitions.

use crate::constants::{DEFAULT_INPUT_SIZE, DEFAULT_TOP_K};
use crate::imaging::{Normalization, Preprocessor, TensorLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configured models by name.
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,

    /// Default settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Inference settings.
    #[serde(default)]
    pub inference: InferenceConfig,
}

/// Configuration for a single model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub path: PathBuf,

    /// Path to the labels file (bundled labels if absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<PathBuf>,

    /// Square input edge in pixels.
    #[serde(default = "default_input_size")]
    pub input_size: u32,

    /// Pixel normalization the model was trained with.
    #[serde(default)]
    pub normalization: Normalization,

    /// Input tensor layout.
    #[serde(default)]
    pub layout: TensorLayout,

    /// What the model's output vector contains.
    #[serde(default)]
    pub activation: OutputActivation,
}

const fn default_input_size() -> u32 {
    DEFAULT_INPUT_SIZE
}

impl ModelConfig {
    /// Model configuration with the deployed model's preprocessing defaults.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            labels: None,
            input_size: DEFAULT_INPUT_SIZE,
            normalization: Normalization::default(),
            layout: TensorLayout::default(),
            activation: OutputActivation::default(),
        }
    }

    /// Preprocessor matching this model's training convention.
    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor::square(self.input_size, self.normalization, self.layout)
    }
}

/// Default analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name to use.
    pub model: Option<String>,

    /// Species reference data file.
    pub reference: Option<PathBuf>,

    /// Number of ranked predictions to report.
    pub top_k: usize,

    /// Output mode for results.
    pub output_mode: OutputMode,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: None,
            reference: None,
            top_k: DEFAULT_TOP_K,
            output_mode: OutputMode::default(),
        }
    }
}

/// Inference device configuration.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Automatically select (GPU if available, else CPU).
    #[default]
    Auto,
    /// Force GPU (CUDA), fail if unavailable.
    Gpu,
    /// Force CPU inference.
    Cpu,
}

/// Inference settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,
}

/// Interpretation of the model's output vector.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputActivation {
    /// The model ends in a softmax layer.
    #[default]
    Probabilities,
    /// Raw scores; softmax is applied after inference.
    Logits,
}

impl std::fmt::Display for OutputActivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Probabilities => write!(f, "probabilities"),
            Self::Logits => write!(f, "logits"),
        }
    }
}

/// How results are written to stdout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-readable report.
    #[default]
    Human,
    /// A single JSON document.
    Json,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_config_default_values() {
        let defaults = DefaultsConfig::default();
        assert_eq!(defaults.top_k, 3);
        assert!(defaults.model.is_none());
        assert!(defaults.reference.is_none());
        assert_eq!(defaults.output_mode, OutputMode::Human);
    }

    #[test]
    fn test_model_config_defaults_match_deployed_model() {
        let model: ModelConfig = toml::from_str(r#"path = "model.onnx""#).unwrap();
        assert_eq!(model, ModelConfig::with_path(PathBuf::from("model.onnx")));
        assert_eq!(model.input_size, 224);
        assert_eq!(model.normalization, Normalization::UnitScale);
        assert_eq!(model.layout, TensorLayout::Nhwc);
        assert_eq!(model.activation, OutputActivation::Probabilities);
    }

    #[test]
    fn test_model_config_variant() {
        let model: ModelConfig = toml::from_str(
            r#"
path = "efficientnet.onnx"
labels = "labels.txt"
input_size = 190
normalization = "mobile_net"
layout = "nchw"
activation = "logits"
"#,
        )
        .unwrap();
        assert_eq!(model.labels, Some(PathBuf::from("labels.txt")));
        assert_eq!(model.preprocessor().output_shape(), [1, 3, 190, 190]);
        assert_eq!(model.activation, OutputActivation::Logits);
    }

    #[test]
    fn test_inference_device_parse() {
        let config: InferenceConfig = toml::from_str(r#"device = "gpu""#).unwrap();
        assert_eq!(config.device, InferenceDevice::Gpu);
    }
}
