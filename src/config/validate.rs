//! Configuration validation.

use crate::config::{Config, ModelConfig};
use crate::constants::{MAX_INPUT_SIZE, MAX_TOP_K};
use crate::error::{Error, Result};

/// Validate the entire configuration.
///
/// File existence is not checked here; see [`validate_model_config`].
pub fn validate_config(config: &Config) -> Result<()> {
    validate_defaults(config)?;
    for (name, model) in &config.models {
        validate_model_settings(name, model)?;
    }
    Ok(())
}

/// Validate default settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    if !(1..=MAX_TOP_K).contains(&defaults.top_k) {
        return Err(Error::ConfigValidation {
            message: format!(
                "top_k must be between 1 and {MAX_TOP_K}, got {}",
                defaults.top_k
            ),
        });
    }

    if let Some(ref model_name) = defaults.model
        && !config.models.contains_key(model_name)
    {
        return Err(Error::ModelNotFound {
            name: model_name.clone(),
        });
    }

    Ok(())
}

/// Validate numeric model settings.
fn validate_model_settings(name: &str, model: &ModelConfig) -> Result<()> {
    if !(1..=MAX_INPUT_SIZE).contains(&model.input_size) {
        return Err(Error::ConfigValidation {
            message: format!(
                "model '{name}': input_size must be between 1 and {MAX_INPUT_SIZE}, got {}",
                model.input_size
            ),
        });
    }
    Ok(())
}

/// Validate a model configuration and check its files exist.
pub fn validate_model_config(name: &str, model: &ModelConfig) -> Result<()> {
    validate_model_settings(name, model)?;

    if !model.path.exists() {
        return Err(Error::ModelFileNotFound {
            path: model.path.clone(),
        });
    }

    if let Some(labels) = &model.labels
        && !labels.exists()
    {
        return Err(Error::LabelsFileNotFound {
            path: labels.clone(),
        });
    }

    Ok(())
}

/// Get a model by name from the config.
pub fn get_model<'a>(config: &'a Config, name: &str) -> Result<&'a ModelConfig> {
    config.models.get(name).ok_or_else(|| Error::ModelNotFound {
        name: name.to_string(),
    })
}
