//! WASM-compatible wrapper types for raster results.

use std::sync::Arc;

use postcrop_core::raster::{FilterType, RasterResult};
use wasm_bindgen::prelude::*;

/// A rasterized platform image for JavaScript.
///
/// The PNG bytes live in WASM memory; `png()` copies them into a
/// `Uint8Array`, `data_url()` is ready to use as an `<img>` source.
#[wasm_bindgen]
pub struct JsRasterResult {
    inner: Arc<RasterResult>,
}

#[wasm_bindgen]
impl JsRasterResult {
    /// Platform identifier
    #[wasm_bindgen(getter)]
    pub fn platform(&self) -> String {
        self.inner.platform.to_string()
    }

    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Encoded PNG bytes (copied)
    pub fn png(&self) -> Vec<u8> {
        self.inner.encoded_image.clone()
    }

    /// PNG bytes as base64
    pub fn base64(&self) -> String {
        self.inner.to_base64()
    }

    /// PNG as a `data:` URL
    pub fn data_url(&self) -> String {
        self.inner.data_url()
    }
}

impl JsRasterResult {
    pub(crate) fn from_result(inner: Arc<RasterResult>) -> Self {
        Self { inner }
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Lanczos3.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        _ => FilterType::Lanczos3,
    }
}

/// Error value handed to JavaScript.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> JsRasterResult {
        JsRasterResult::from_result(Arc::new(RasterResult {
            platform: "instagram".into(),
            encoded_image: vec![137, 80, 78, 71],
            width: 400,
            height: 400,
        }))
    }

    #[test]
    fn test_raster_result_accessors() {
        let r = result();
        assert_eq!(r.platform(), "instagram");
        assert_eq!((r.width(), r.height()), (400, 400));
        assert_eq!(r.png(), vec![137, 80, 78, 71]);
    }

    #[test]
    fn test_raster_result_encodings() {
        let r = result();
        assert_eq!(r.base64(), "iVBORw==");
        assert_eq!(r.data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        // Unknown values default to Lanczos3
        assert_eq!(filter_from_u8(255), FilterType::Lanczos3);
    }
}
