//! Classifier backends.

use crate::config::InferenceDevice;
use crate::error::{Error, Result};
use crate::imaging::ImageTensor;
use ort::environment::Environment;
use ort::ep::{self, ExecutionProvider};
use ort::session::Session;
use ort::value::{Tensor, ValueType};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info, warn};

/// An opaque trained image classifier.
///
/// Implementations must be deterministic: the same tensor always yields the
/// same score vector.
pub trait Model {
    /// Run one forward pass, returning one score per class.
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>>;

    /// Number of classes, if the model declares it.
    fn output_len(&self) -> Option<usize> {
        None
    }
}

/// ONNX Runtime backed classifier.
pub struct OnnxModel {
    session: Mutex<Session>,
    output_len: Option<usize>,
    device: &'static str,
}

impl OnnxModel {
    /// Load an ONNX model file and build an inference session.
    ///
    /// This is the expensive step; do it once per process.
    pub fn load(path: &Path, device: InferenceDevice) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let environment = runtime_environment()?;
        let builder = Session::builder(&environment).map_err(build_error)?;

        let (mut builder, device_name) = match device {
            InferenceDevice::Cpu => {
                info!("Requested device: CPU");
                (builder, "CPU")
            }
            InferenceDevice::Auto => {
                if cuda_available() {
                    info!("Auto mode: CUDA available, attempting GPU");
                    let builder = builder
                        .with_execution_providers([ep::CUDA::default().build()])
                        .map_err(build_error)?;
                    (builder, "CUDA")
                } else {
                    info!("Auto mode: No GPU providers available, using CPU");
                    (builder, "Auto (CPU)")
                }
            }
            InferenceDevice::Gpu => {
                if !cuda_available() {
                    return Err(Error::ClassifierBuild {
                        reason: "CUDA provider not available\n\nTry one of:\n  insectifica --cpu <image>     (use CPU)\n  insectifica <image>           (auto mode with fallback)".to_string(),
                    });
                }
                info!("--gpu: Selected CUDA provider");
                let builder = builder
                    .with_execution_providers([ep::CUDA::default().build().error_on_failure()])
                    .map_err(build_error)?;
                (builder, "CUDA")
            }
        };

        let session = builder.commit_from_file(path).map_err(build_error)?;

        let output_len = session
            .outputs()
            .first()
            .and_then(|output| class_count(output.dtype()));

        info!(
            "Loaded model: {}, classes: {}, device: {}",
            path.display(),
            output_len.map_or_else(|| "dynamic".to_string(), |n| n.to_string()),
            device_name
        );

        Ok(Self {
            session: Mutex::new(session),
            output_len,
            device: device_name,
        })
    }

    /// Human-readable name of the execution device.
    pub fn device(&self) -> &'static str {
        self.device
    }
}

impl Model for OnnxModel {
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>> {
        let tensor = Tensor::from_array((input.shape_i64(), input.data.clone().into_boxed_slice()))
            .map_err(inference_error)?;

        let mut session = self.session.lock().map_err(|_| Error::Internal {
            message: "model session lock poisoned".to_string(),
        })?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(inference_error)?;

        if outputs.len() == 0 {
            return Err(Error::Inference {
                reason: "model produced no outputs".to_string(),
            });
        }
        let (shape, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(inference_error)?;
        debug!("Model output shape: {shape:?}");

        Ok(scores.to_vec())
    }

    fn output_len(&self) -> Option<usize> {
        self.output_len
    }
}

/// Process-wide ONNX Runtime environment; sessions are built against it.
fn runtime_environment() -> Result<Environment> {
    static ENVIRONMENT: OnceLock<std::result::Result<Environment, String>> = OnceLock::new();

    ENVIRONMENT
        .get_or_init(|| {
            ort::init()
                .with_name(crate::constants::APP_NAME)
                .build()
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(|reason| Error::ClassifierBuild {
            reason: format!("failed to initialize ONNX Runtime: {reason}"),
        })
}

fn cuda_available() -> bool {
    match ep::CUDA::is_available() {
        Ok(available) => available,
        Err(e) => {
            warn!("Could not query CUDA availability: {e}");
            false
        }
    }
}

/// Class count from the model's declared output type (last dimension).
fn class_count(output_type: &ValueType) -> Option<usize> {
    match output_type {
        ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| usize::try_from(d).ok())
            .filter(|&d| d > 0),
        _ => None,
    }
}

fn build_error(e: impl std::fmt::Display) -> Error {
    Error::ClassifierBuild {
        reason: e.to_string(),
    }
}

fn inference_error(e: impl std::fmt::Display) -> Error {
    Error::Inference {
        reason: e.to_string(),
    }
}
