//! Turning a model's score vector into a prediction.

use crate::constants::confidence;
use crate::error::{Error, Result};

/// One class and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedClass {
    /// Model output index.
    pub index: usize,
    /// Probability in `[0, 1]`.
    pub confidence: f32,
}

/// Result of classifying one image.
///
/// `index` is not guaranteed to be a valid label index; lookups must go
/// through [`crate::taxonomy::LabelTable::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Index of the highest-scoring class.
    pub index: usize,
    /// Score of that class, used as display confidence.
    pub confidence: f32,
    /// Highest-scoring classes in descending order; the first entry is the prediction.
    pub ranked: Vec<RankedClass>,
}

/// Numerically stable softmax.
///
/// NaN inputs map to zero probability.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f32::NEG_INFINITY, f32::max);

    if !max.is_finite() {
        return vec![0.0; logits.len()];
    }

    let exps: Vec<f32> = logits
        .iter()
        .map(|&v| if v.is_nan() { 0.0 } else { (v - max).exp() })
        .collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Pick the arg-max class and the `top_k` best classes.
///
/// Ranking uses the raw scores; only the reported confidences are clamped
/// to `[0, 1]`. Ties resolve to the lowest index; NaN scores never win.
pub fn decide(scores: &[f32], top_k: usize) -> Result<Prediction> {
    let mut ranked: Vec<RankedClass> = scores
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(index, &v)| RankedClass {
            index,
            confidence: v,
        })
        .collect();

    if ranked.is_empty() {
        return Err(Error::Inference {
            reason: format!(
                "model returned no usable scores ({} values)",
                scores.len()
            ),
        });
    }

    // Stable sort keeps index order among equal scores.
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked.truncate(top_k.max(1));
    for class in &mut ranked {
        class.confidence = class.confidence.clamp(confidence::MIN, confidence::MAX);
    }

    let best = ranked[0];
    Ok(Prediction {
        index: best.index,
        confidence: best.confidence,
        ranked,
    })
}
