//! Conversion of decoded images into model input tensors.

use crate::constants::normalization::{MOBILENET_DIVISOR, MOBILENET_OFFSET, UNIT_SCALE_DIVISOR};
use image::DynamicImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

/// Pixel scaling convention the classifier was trained with.
///
/// The two conventions are not interchangeable: feeding a model the wrong
/// one does not fail, it silently degrades predictions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Divide by 255, values in `[0, 1]`.
    #[default]
    UnitScale,
    /// `MobileNet` family scaling, values in `[-1, 1]`.
    MobileNet,
}

impl Normalization {
    /// Normalize a single 8-bit channel value.
    #[inline]
    pub fn apply(self, value: u8) -> f32 {
        let v = f32::from(value);
        match self {
            Self::UnitScale => v / UNIT_SCALE_DIVISOR,
            Self::MobileNet => v / MOBILENET_DIVISOR - MOBILENET_OFFSET,
        }
    }

    /// Inclusive output range.
    pub const fn range(self) -> (f32, f32) {
        match self {
            Self::UnitScale => (0.0, 1.0),
            Self::MobileNet => (-1.0, 1.0),
        }
    }
}

impl std::fmt::Display for Normalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnitScale => write!(f, "unit_scale"),
            Self::MobileNet => write!(f, "mobile_net"),
        }
    }
}

/// Memory layout of the input tensor.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[batch, height, width, channels]` (Keras / TensorFlow exports).
    #[default]
    Nhwc,
    /// `[batch, channels, height, width]` (PyTorch exports).
    Nchw,
}

impl std::fmt::Display for TensorLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nhwc => write!(f, "nhwc"),
            Self::Nchw => write!(f, "nchw"),
        }
    }
}

/// A single-image input tensor with a leading batch dimension of 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    /// Tensor shape, batch first.
    pub shape: [usize; 4],
    /// Row-major tensor data.
    pub data: Vec<f32>,
}

impl ImageTensor {
    /// Shape as signed dimensions, as expected by ONNX Runtime.
    #[allow(clippy::cast_possible_wrap)]
    pub fn shape_i64(&self) -> [i64; 4] {
        self.shape.map(|d| d as i64)
    }
}

/// Resizes and normalizes images to a model's fixed input shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preprocessor {
    width: u32,
    height: u32,
    normalization: Normalization,
    layout: TensorLayout,
}

impl Preprocessor {
    /// Create a preprocessor for the given input dimensions.
    pub const fn new(
        width: u32,
        height: u32,
        normalization: Normalization,
        layout: TensorLayout,
    ) -> Self {
        Self {
            width,
            height,
            normalization,
            layout,
        }
    }

    /// Create a preprocessor for a square input.
    pub const fn square(size: u32, normalization: Normalization, layout: TensorLayout) -> Self {
        Self::new(size, size, normalization, layout)
    }

    /// Target width in pixels.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Pixel normalization in use.
    pub const fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Tensor layout in use.
    pub const fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Shape of every tensor this preprocessor produces.
    pub const fn output_shape(&self) -> [usize; 4] {
        let h = self.height as usize;
        let w = self.width as usize;
        match self.layout {
            TensorLayout::Nhwc => [1, h, w, 3],
            TensorLayout::Nchw => [1, 3, h, w],
        }
    }

    /// Convert an image to the model's input tensor.
    ///
    /// Any colour type is accepted; grayscale and alpha images are converted
    /// to 3-channel RGB before resizing.
    pub fn preprocess(&self, image: &DynamicImage) -> ImageTensor {
        let rgb = image.to_rgb8();
        let resized = if rgb.dimensions() == (self.width, self.height) {
            rgb
        } else {
            imageops::resize(&rgb, self.width, self.height, FilterType::CatmullRom)
        };

        let w = self.width as usize;
        let h = self.height as usize;
        let plane = w * h;
        let mut data = vec![0.0_f32; plane * 3];

        for (x, y, pixel) in resized.enumerate_pixels() {
            let offset = y as usize * w + x as usize;
            for (channel, &value) in pixel.0.iter().enumerate() {
                let idx = match self.layout {
                    TensorLayout::Nhwc => offset * 3 + channel,
                    TensorLayout::Nchw => channel * plane + offset,
                };
                data[idx] = self.normalization.apply(value);
            }
        }

        ImageTensor {
            shape: self.output_shape(),
            data,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        #[allow(clippy::cast_possible_truncation)]
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_output_shape_for_arbitrary_sizes() {
        let pre = Preprocessor::square(224, Normalization::UnitScale, TensorLayout::Nhwc);
        for (w, h) in [(1, 1), (224, 224), (640, 480), (97, 513)] {
            let tensor = pre.preprocess(&gradient(w, h));
            assert_eq!(tensor.shape, [1, 224, 224, 3]);
            assert_eq!(tensor.data.len(), 224 * 224 * 3);
        }
    }

    #[test]
    fn test_nchw_shape() {
        let pre = Preprocessor::square(190, Normalization::MobileNet, TensorLayout::Nchw);
        let tensor = pre.preprocess(&gradient(300, 200));
        assert_eq!(tensor.shape, [1, 3, 190, 190]);
        assert_eq!(tensor.shape_i64(), [1, 3, 190, 190]);
        assert_eq!(tensor.data.len(), 3 * 190 * 190);
    }

    #[test]
    fn test_unit_scale_range() {
        let pre = Preprocessor::square(32, Normalization::UnitScale, TensorLayout::Nhwc);
        let tensor = pre.preprocess(&gradient(300, 300));
        let (lo, hi) = Normalization::UnitScale.range();
        assert_eq!((lo, hi), (0.0, 1.0));
        assert!(tensor.data.iter().all(|v| (lo..=hi).contains(v)));
    }

    #[test]
    fn test_mobilenet_range() {
        let pre = Preprocessor::square(32, Normalization::MobileNet, TensorLayout::Nhwc);
        let tensor = pre.preprocess(&gradient(300, 300));
        let (lo, hi) = Normalization::MobileNet.range();
        assert_eq!((lo, hi), (-1.0, 1.0));
        assert!(tensor.data.iter().all(|v| (lo..=hi).contains(v)));
    }

    #[test]
    fn test_normalization_endpoints() {
        assert_eq!(Normalization::UnitScale.apply(0), 0.0);
        assert_eq!(Normalization::UnitScale.apply(255), 1.0);
        assert_eq!(Normalization::MobileNet.apply(0), -1.0);
        assert_eq!(Normalization::MobileNet.apply(255), 1.0);
    }

    #[test]
    fn test_grayscale_is_expanded_to_rgb() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([51])));
        let pre = Preprocessor::square(4, Normalization::UnitScale, TensorLayout::Nhwc);
        let tensor = pre.preprocess(&gray);

        assert_eq!(tensor.shape, [1, 4, 4, 3]);
        assert!(tensor.data.iter().all(|&v| v == 0.2));
    }

    #[test]
    fn test_alpha_channel_is_dropped() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 7])));
        let pre = Preprocessor::square(2, Normalization::UnitScale, TensorLayout::Nhwc);
        let tensor = pre.preprocess(&rgba);

        assert_eq!(tensor.data.len(), 2 * 2 * 3);
        assert_eq!(&tensor.data[..3], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_layout_ordering() {
        // 2x1 image: left pixel red, right pixel green.
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        let img = DynamicImage::ImageRgb8(img);

        let nhwc = Preprocessor::new(2, 1, Normalization::UnitScale, TensorLayout::Nhwc)
            .preprocess(&img);
        assert_eq!(nhwc.data, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);

        let nchw = Preprocessor::new(2, 1, Normalization::UnitScale, TensorLayout::Nchw)
            .preprocess(&img);
        assert_eq!(nchw.data, vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(nchw.shape, [1, 3, 1, 2]);
    }

    #[test]
    fn test_deterministic() {
        let pre = Preprocessor::square(64, Normalization::MobileNet, TensorLayout::Nhwc);
        let img = gradient(123, 77);
        assert_eq!(pre.preprocess(&img), pre.preprocess(&img));
    }
}
