//! Image decoding and tensor preprocessing.

mod decode;
mod preprocess;

pub use decode::{decode_image, is_image_file};
pub use preprocess::{ImageTensor, Normalization, Preprocessor, TensorLayout};
