//! Error types for insectifica.

/// Result type alias for insectifica operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for insectifica.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Model not found in configuration.
    #[error("model '{name}' not found in configuration")]
    ModelNotFound {
        /// Name of the missing model.
        name: String,
    },

    /// Model already exists in configuration.
    #[error("model '{name}' already exists in configuration")]
    ModelAlreadyExists {
        /// Name of the existing model.
        name: String,
    },

    /// Model file does not exist.
    #[error("model file does not exist: {path}")]
    ModelFileNotFound {
        /// Path to the missing model file.
        path: std::path::PathBuf,
    },

    /// Labels file does not exist.
    #[error("labels file does not exist: {path}")]
    LabelsFileNotFound {
        /// Path to the missing labels file.
        path: std::path::PathBuf,
    },

    /// Failed to read labels file.
    #[error("failed to read labels file '{path}'")]
    LabelsRead {
        /// Path to the labels file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Label table contains no entries.
    #[error("label table '{source_name}' contains no labels")]
    EmptyLabelTable {
        /// Where the labels came from.
        source_name: String,
    },

    /// No reference data file was configured.
    #[error("no reference data file specified (use --reference or set defaults.reference in config)")]
    ReferenceNotConfigured,

    /// Reference data file does not exist.
    #[error("reference data file does not exist: {path}")]
    ReferenceFileNotFound {
        /// Path to the missing reference file.
        path: std::path::PathBuf,
    },

    /// Failed to read reference data file.
    #[error("failed to read reference data file '{path}'")]
    ReferenceRead {
        /// Path to the reference file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse reference data file.
    #[error("failed to parse reference data file '{path}'")]
    ReferenceParse {
        /// Path to the reference file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Species has no entry in the reference data.
    #[error("species '{name}' not found in reference data")]
    SpeciesNotFound {
        /// Requested species name.
        name: String,
    },

    /// No valid image files found.
    #[error("no valid image files found in the provided paths")]
    NoValidImageFiles,

    /// Unsupported image file extension.
    #[error("unsupported image format '{path}' (expected jpg, jpeg or png)")]
    UnsupportedImageFormat {
        /// Path to the image file.
        path: std::path::PathBuf,
    },

    /// Failed to decode image.
    #[error("failed to decode image '{path}'")]
    ImageDecode {
        /// Path to the image file.
        path: std::path::PathBuf,
        /// Underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to build classifier.
    #[error("failed to build classifier: {reason}")]
    ClassifierBuild {
        /// Description of the build failure.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// Failed to write CSV results.
    #[error("failed to write CSV results '{path}'")]
    CsvWrite {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON output")]
    JsonSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Stable `snake_case` identifier for machine-readable output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::ConfigDirNotFound
            | Self::ConfigRead { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValidation { .. }
            | Self::ConfigWrite { .. }
            | Self::ConfigSerialize { .. } => "config_error",
            Self::ModelNotFound { .. }
            | Self::ModelAlreadyExists { .. }
            | Self::ModelFileNotFound { .. } => "model_error",
            Self::LabelsFileNotFound { .. }
            | Self::LabelsRead { .. }
            | Self::EmptyLabelTable { .. } => "labels_error",
            Self::ReferenceNotConfigured
            | Self::ReferenceFileNotFound { .. }
            | Self::ReferenceRead { .. }
            | Self::ReferenceParse { .. }
            | Self::SpeciesNotFound { .. } => "reference_error",
            Self::NoValidImageFiles
            | Self::UnsupportedImageFormat { .. }
            | Self::ImageDecode { .. } => "image_error",
            Self::ClassifierBuild { .. } | Self::Inference { .. } => "inference_error",
            Self::CsvWrite { .. } | Self::JsonSerialize { .. } => "output_error",
            Self::Internal { .. } => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::ReferenceNotConfigured.code(), "reference_error");
        assert_eq!(
            Error::UnsupportedImageFormat {
                path: PathBuf::from("a.gif")
            }
            .code(),
            "image_error"
        );
        assert_eq!(
            Error::Inference {
                reason: "shape".to_string()
            }
            .code(),
            "inference_error"
        );
    }

    #[test]
    fn test_display_includes_path() {
        let err = Error::ModelFileNotFound {
            path: PathBuf::from("/models/insects.onnx"),
        };
        assert!(err.to_string().contains("/models/insects.onnx"));
    }
}
