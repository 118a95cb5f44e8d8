//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "insectifica";

/// Default number of ranked predictions kept per image.
pub const DEFAULT_TOP_K: usize = 3;

/// Maximum number of ranked predictions that may be requested.
pub const MAX_TOP_K: usize = 20;

/// Default square input edge in pixels for the deployed `MobileNetV2` model.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Largest accepted model input edge in pixels.
pub const MAX_INPUT_SIZE: u32 = 4096;

/// Image file extensions accepted as input (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
    /// Decimal places for confidence in machine-readable output.
    pub const DECIMAL_PLACES: usize = 4;
    /// Decimal places for the percentage shown to users.
    pub const PERCENT_DECIMAL_PLACES: usize = 1;
}

/// Pixel normalization constants.
pub mod normalization {
    /// Divisor mapping 8-bit channels onto `[0, 1]`.
    pub const UNIT_SCALE_DIVISOR: f32 = 255.0;
    /// Divisor used by the `MobileNet` family before shifting onto `[-1, 1]`.
    pub const MOBILENET_DIVISOR: f32 = 127.5;
    /// Offset subtracted after the `MobileNet` divisor.
    pub const MOBILENET_OFFSET: f32 = 1.0;
}

/// Placeholder text used when a reference record lacks a field.
pub mod placeholders {
    /// Default for taxonomy fields.
    pub const TAXONOMY: &str = "N/A";
    /// Default for narrative fields (host crops, damage, management).
    pub const NARRATIVE: &str = "Not available";
}

/// User-facing messages for the non-fatal classification outcomes.
pub mod messages {
    /// Predicted index does not map onto the label table.
    pub const UNCLASSIFIABLE: &str = "The provided image does not meet the classification requirements. Kindly upload another image for proper analysis.";
    /// Predicted species has no reference record.
    pub const DETAILS_UNAVAILABLE: &str = "Details for the predicted species are not available. Please upload another image or update the dataset.";
}
