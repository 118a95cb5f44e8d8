//! Classifier adapter combining preprocessing, model and decision.

use crate::config::{InferenceDevice, ModelConfig, OutputActivation};
use crate::error::Result;
use crate::imaging::{ImageTensor, Preprocessor};
use crate::inference::{Model, OnnxModel, Prediction, decide, softmax};
use crate::taxonomy::LabelTable;
use image::DynamicImage;
use tracing::{debug, info, warn};

/// Image classifier with its fixed preprocessing convention.
///
/// Built once at startup and shared by reference for the rest of the run.
pub struct InsectClassifier {
    model: Box<dyn Model>,
    preprocessor: Preprocessor,
    activation: OutputActivation,
    top_k: usize,
}

impl InsectClassifier {
    /// Wrap an already-loaded model.
    pub fn new(
        model: Box<dyn Model>,
        preprocessor: Preprocessor,
        activation: OutputActivation,
        top_k: usize,
    ) -> Self {
        Self {
            model,
            preprocessor,
            activation,
            top_k,
        }
    }

    /// Load the ONNX model named by a model configuration.
    pub fn from_config(
        model_config: &ModelConfig,
        device: InferenceDevice,
        top_k: usize,
    ) -> Result<Self> {
        let model = OnnxModel::load(&model_config.path, device)?;
        let preprocessor = model_config.preprocessor();

        info!(
            "Device: {}, preprocessing: {}x{}, normalization: {}, layout: {}, activation: {}",
            model.device(),
            preprocessor.width(),
            preprocessor.height(),
            preprocessor.normalization(),
            preprocessor.layout(),
            model_config.activation
        );

        Ok(Self::new(
            Box::new(model),
            preprocessor,
            model_config.activation,
            top_k,
        ))
    }

    /// Preprocessing applied before inference.
    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Number of ranked classes kept per prediction.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Warn when the model's declared class count disagrees with the labels.
    ///
    /// Returns `false` on a known mismatch.
    pub fn check_label_count(&self, labels: &LabelTable) -> bool {
        match self.model.output_len() {
            Some(n) if n != labels.len() => {
                warn!(
                    "Model declares {} classes but the label table has {}; predictions beyond the table will be reported as unclassifiable",
                    n,
                    labels.len()
                );
                false
            }
            Some(n) => {
                debug!("Model class count matches label table ({n})");
                true
            }
            None => true,
        }
    }

    /// Probabilities for a preprocessed tensor.
    pub fn scores(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let raw = self.model.predict(tensor)?;
        Ok(match self.activation {
            OutputActivation::Probabilities => raw,
            OutputActivation::Logits => softmax(&raw),
        })
    }

    /// Classify one decoded image.
    pub fn infer(&self, image: &DynamicImage) -> Result<Prediction> {
        let tensor = self.preprocessor.preprocess(image);
        let scores = self.scores(&tensor)?;
        decide(&scores, self.top_k)
    }
}
