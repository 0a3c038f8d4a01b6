//! WASM bindings for the stateless crop geometry.
//!
//! These let the editor compute preview transforms and source rectangles
//! without a session, e.g. for thumbnails of saved drafts.

use postcrop_core::geometry::{self, CropBox, CropTransform, Size};
use postcrop_core::media::{supports_crop, MediaType};
use wasm_bindgen::prelude::*;

/// Pan/zoom transform for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropTransform {
    inner: CropTransform,
}

#[wasm_bindgen]
impl JsCropTransform {
    /// Create a transform; values are clamped to their valid ranges.
    #[wasm_bindgen(constructor)]
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> JsCropTransform {
        Self {
            inner: CropTransform::new(zoom, offset_x, offset_y).clamped(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom
    }

    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> f64 {
        self.inner.offset_x
    }

    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> f64 {
        self.inner.offset_y
    }

    /// CSS `transform` value for the preview image
    pub fn css(&self) -> String {
        self.inner.css()
    }
}

/// Source rectangle in image pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsSourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Transform that makes a crop box fill its container.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const t = box_to_transform(250, 250, 125, 125, 500, 500);
/// img.style.transform = t.css();
/// ```
#[wasm_bindgen]
pub fn box_to_transform(
    width: f64,
    height: f64,
    left: f64,
    top: f64,
    container_width: f64,
    container_height: f64,
) -> JsCropTransform {
    JsCropTransform {
        inner: geometry::box_to_transform(
            &CropBox::new(width, height, left, top),
            Size::new(container_width, container_height),
        ),
    }
}

/// Source pixels shown by a preview container under `transform`.
#[wasm_bindgen]
pub fn source_rect(
    image_width: f64,
    image_height: f64,
    container_width: f64,
    container_height: f64,
    transform: &JsCropTransform,
) -> JsSourceRect {
    let rect = geometry::source_rect(
        Size::new(image_width, image_height),
        Size::new(container_width, container_height),
        &transform.inner,
    );
    JsSourceRect {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
    }
}

/// CSS transform string for raw transform values.
#[wasm_bindgen]
pub fn transform_css(zoom: f64, offset_x: f64, offset_y: f64) -> String {
    JsCropTransform::new(zoom, offset_x, offset_y).css()
}

/// Check whether media with this MIME type goes through the crop editor.
///
/// Videos and animated GIFs are published unmodified.
#[wasm_bindgen]
pub fn supports_crop_mime(mime: &str) -> bool {
    MediaType::from_mime(mime).is_some_and(supports_crop)
}
