//! Source image decoding.
//!
//! Any format enabled on the `image` crate (JPEG, PNG, WebP, GIF) is
//! accepted; the format is guessed from the content. EXIF orientation is
//! applied so that crop geometry always works on the upright image the user
//! sees in the preview.

mod reader;
mod types;

pub use reader::decode_image;
pub use types::{DecodeError, DecodedImage, Orientation};
