//! Configuration file loading and saving.

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Load configuration from a TOML file.
///
/// Returns default config if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load configuration from the default platform-specific path.
///
/// Returns default config if no config file exists.
pub fn load_default_config() -> Result<Config> {
    super::config_file_path().map_or_else(|_| Ok(Config::default()), |path| load_config_file(&path))
}

/// Save configuration to a TOML file, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize { source: e })?;

    std::fs::write(path, contents).map_err(|e| Error::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save configuration to the default platform-specific path.
pub fn save_default_config(config: &Config) -> Result<std::path::PathBuf> {
    let path = super::config_file_path()?;
    save_config(config, &path)?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{InferenceDevice, ModelConfig};
    use crate::imaging::Normalization;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_nonexistent_file_returns_default() {
        let config = load_config_file(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert!(config.models.is_empty());
        assert!(config.defaults.reference.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[models.mobilenetv2]
path = "/models/mobilenetv2_insect_best.onnx"

[models.efficientnet]
path = "/models/efficientnet.onnx"
input_size = 190
normalization = "mobile_net"

[defaults]
model = "mobilenetv2"
reference = "/data/pest.json"
top_k = 5

[inference]
device = "cpu"
"#
        )
        .unwrap();

        let config = load_config_file(file.path()).unwrap();
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models["efficientnet"].input_size, 190);
        assert_eq!(
            config.models["efficientnet"].normalization,
            Normalization::MobileNet
        );
        assert_eq!(config.defaults.model.as_deref(), Some("mobilenetv2"));
        assert_eq!(
            config.defaults.reference,
            Some(PathBuf::from("/data/pest.json"))
        );
        assert_eq!(config.defaults.top_k, 5);
        assert_eq!(config.inference.device, InferenceDevice::Cpu);
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let result = load_config_file(file.path());
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_save_then_load_preserves_models() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.models.insert(
            "insects".to_string(),
            ModelConfig::with_path(PathBuf::from("/models/insects.onnx")),
        );
        config.defaults.model = Some("insects".to_string());

        save_config(&config, &path).unwrap();
        let loaded = load_config_file(&path).unwrap();

        assert_eq!(loaded.models["insects"], config.models["insects"]);
        assert_eq!(loaded.defaults.model.as_deref(), Some("insects"));
    }
}
