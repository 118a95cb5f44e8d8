//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::constants::{MAX_INPUT_SIZE, MAX_TOP_K};

/// Parse and validate a bounded integer value.
///
/// # Arguments
///
/// * `s` - The string to parse
/// * `min` - Minimum allowed value (inclusive)
/// * `max` - Maximum allowed value (inclusive)
/// * `name` - Name of the parameter for error messages
pub fn parse_bounded_usize(s: &str, min: usize, max: usize, name: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(min..=max).contains(&value) {
        return Err(format!(
            "{name} must be between {min} and {max}, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate the number of ranked predictions (1-20).
pub fn parse_top_k(s: &str) -> Result<usize, String> {
    parse_bounded_usize(s, 1, MAX_TOP_K, "top-k")
}

/// Parse and validate a square model input size in pixels.
pub fn parse_input_size(s: &str) -> Result<u32, String> {
    let value = parse_bounded_usize(s, 1, MAX_INPUT_SIZE as usize, "input size")?;
    u32::try_from(value).map_err(|_| format!("input size {value} is out of range"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_k_valid() {
        assert_eq!(parse_top_k("1").ok(), Some(1));
        assert_eq!(parse_top_k("5").ok(), Some(5));
        assert_eq!(parse_top_k("20").ok(), Some(20));
    }

    #[test]
    fn test_parse_top_k_invalid() {
        assert!(parse_top_k("0").is_err());
        assert!(parse_top_k("21").is_err());
        assert!(parse_top_k("-1").is_err());
        assert!(parse_top_k("three").is_err());
    }

    #[test]
    fn test_parse_input_size() {
        assert_eq!(parse_input_size("224").ok(), Some(224));
        assert_eq!(parse_input_size("190").ok(), Some(190));
        assert!(parse_input_size("0").is_err());
        assert!(parse_input_size("100000").is_err());
    }

    #[test]
    fn test_parse_bounded_usize_messages() {
        let err = parse_bounded_usize("50", 1, 10, "test");
        assert!(err.unwrap_err().contains("test must be between 1 and 10"));

        let err = parse_bounded_usize("abc", 1, 10, "test");
        assert!(err.unwrap_err().contains("not a valid number"));
    }
}
