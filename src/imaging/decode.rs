//! Image file decoding using the image crate.

use crate::constants::IMAGE_EXTENSIONS;
use crate::error::{Error, Result};
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// Check whether a path has an accepted image extension (case-insensitive).
pub fn is_image_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|accepted| ext.eq_ignore_ascii_case(OsStr::new(accepted)))
    })
}

/// Decode an image file.
///
/// Only the file extension is validated up front; malformed content is
/// reported as [`Error::ImageDecode`].
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    if !is_image_file(path) {
        return Err(Error::UnsupportedImageFormat {
            path: path.to_path_buf(),
        });
    }

    let image = image::open(path).map_err(|e| Error::ImageDecode {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    Ok(image)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("bug.jpg")));
        assert!(is_image_file(Path::new("bug.JPEG")));
        assert!(is_image_file(Path::new("dir/bug.png")));
        assert!(!is_image_file(Path::new("bug.gif")));
        assert!(!is_image_file(Path::new("bug")));
    }

    #[test]
    fn test_is_image_file_with_unicode() {
        assert!(is_image_file(Path::new("punaise_tâche.jpg")));
        assert!(is_image_file(Path::new("害虫.png")));
    }

    #[test]
    fn test_decode_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bug.png");
        RgbImage::from_pixel(8, 6, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let image = decode_image(&path).unwrap();
        assert_eq!(image.width(), 8);
        assert_eq!(image.height(), 6);
    }

    #[test]
    fn test_decode_rejects_extension() {
        let result = decode_image(Path::new("notes.txt"));
        assert!(matches!(result, Err(Error::UnsupportedImageFormat { .. })));
    }

    #[test]
    fn test_decode_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let result = decode_image(&path);
        assert!(matches!(result, Err(Error::ImageDecode { .. })));
    }
}
