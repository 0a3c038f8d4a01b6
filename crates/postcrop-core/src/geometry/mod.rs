//! Coordinate transform engine.
//!
//! Four coordinate spaces are involved when a platform preview is edited:
//!
//! 1. **Container space** - the on-screen preview rectangle `(W, H)` of a
//!    platform, origin top-left.
//! 2. **Displayed-image space** - the rectangle the source image occupies in
//!    the container under an object-cover fit (see [`CoverFit`]).
//! 3. **Transform space** - displayed-image space after
//!    `translate(offsetX%, offsetY%) scale(zoom)` with the transform origin
//!    at the container center. Offsets are percentages of the container size.
//! 4. **Source-pixel space** - the native pixel grid of the decoded image.
//!
//! The crop box lives in container space over the untransformed image. The
//! transform derived from it ([`box_to_transform`]) makes the preview show
//! the box content filling the container, and [`source_rect`] maps that
//! preview viewport back to the exact source pixels to rasterize.

mod cover;
mod mapping;

use serde::{Deserialize, Serialize};

pub use cover::CoverFit;
pub use mapping::{box_to_source_rect, box_to_transform, map_screen_rect, source_rect};

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 1.0;
/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 3.0;
/// Minimum pan offset, in percent of the container size.
pub const MIN_OFFSET: f64 = -100.0;
/// Maximum pan offset, in percent of the container size.
pub const MAX_OFFSET: f64 = 100.0;
/// Smallest crop box side in container px.
pub const MIN_BOX_SIZE: f64 = 50.0;
/// Floor for every denominator in the geometry code.
pub const EPSILON: f64 = 1e-6;

/// Width and height in some coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, safe for a zero height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height.max(EPSILON)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The same size with both sides floored at [`EPSILON`].
    pub(crate) fn guarded(&self) -> Size {
        Size::new(self.width.max(EPSILON), self.height.max(EPSILON))
    }
}

/// A point in some coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pan/zoom applied to the displayed image around the container center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropTransform {
    /// Scale factor (1.0 to 3.0)
    pub zoom: f64,
    /// Horizontal translation in percent of the container width (-100 to 100)
    pub offset_x: f64,
    /// Vertical translation in percent of the container height (-100 to 100)
    pub offset_y: f64,
}

impl Default for CropTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl CropTransform {
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            zoom,
            offset_x,
            offset_y,
        }
    }

    /// Check if this is the identity transform
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Copy with zoom and offsets forced into their valid ranges.
    pub fn clamped(&self) -> Self {
        Self {
            zoom: clamp_zoom(self.zoom),
            offset_x: clamp_offset(self.offset_x),
            offset_y: clamp_offset(self.offset_y),
        }
    }

    /// CSS `transform` value that renders this transform in the preview.
    ///
    /// The preview element must use `transform-origin: center` and
    /// `object-fit: cover` for the rasterized output to match it.
    pub fn css(&self) -> String {
        format!(
            "translate({}%, {}%) scale({})",
            self.offset_x, self.offset_y, self.zoom
        )
    }
}

/// Crop rectangle in container-local px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

impl CropBox {
    pub fn new(width: f64, height: f64, left: f64, top: f64) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }

    /// A box covering the whole container.
    pub fn covering(container: Size) -> Self {
        Self::new(container.width, container.height, 0.0, 0.0)
    }

    /// A box of the given size centered in the container.
    pub fn centered(container: Size, width: f64, height: f64) -> Self {
        Self::new(
            width,
            height,
            (container.width - width) / 2.0,
            (container.height - height) / 2.0,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Sub-rectangle of the source image in source px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the rectangle lies within `[0, width] x [0, height]`.
    pub fn is_within(&self, image: Size) -> bool {
        const SLACK: f64 = 1e-9;
        self.x >= -SLACK
            && self.y >= -SLACK
            && self.x + self.width <= image.width + SLACK
            && self.y + self.height <= image.height + SLACK
    }
}

/// Clamp a zoom value to `[MIN_ZOOM, MAX_ZOOM]`; NaN becomes `MIN_ZOOM`.
#[inline]
pub fn clamp_zoom(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_ZOOM;
    }
    value.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Clamp an offset value to `[MIN_OFFSET, MAX_OFFSET]`; NaN becomes 0.
#[inline]
pub fn clamp_offset(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    // Adding +0.0 turns -0.0 into 0.0
    value.clamp(MIN_OFFSET, MAX_OFFSET) + 0.0
}
