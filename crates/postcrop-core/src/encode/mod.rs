//! Raster encoding.
//!
//! Rasterized platform images are encoded as PNG: lossless, so the published
//! bytes match the previewed pixels, and alpha survives for transparent
//! sources.

mod png;

pub use png::{encode_png, EncodeError};
