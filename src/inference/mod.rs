//! Inference module for insect species classification.

mod classifier;
mod decision;
mod model;

pub use classifier::InsectClassifier;
pub use decision::{Prediction, RankedClass, decide, softmax};
pub use model::{Model, OnnxModel};
