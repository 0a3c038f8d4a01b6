//! Interactive manipulation controllers.
//!
//! Two front-ends drive the same geometry:
//!
//! - [`CropBoxController`] moves and resizes the crop box; the preview
//!   transform follows the box on every tick.
//! - [`PanController`] pans and zooms the image directly (modal editor).
//!
//! Controllers only read the store while a gesture is in flight. They return
//! a [`LivePreview`] per pointer tick and write the store once, on release,
//! returning a [`Commit`] so the caller can regenerate that platform's raster.

mod crop_box;
mod pan;

use serde::{Deserialize, Serialize};

use crate::geometry::{CropBox, CropTransform};
use crate::platform::PlatformId;
use crate::state::PlatformCropConfig;

pub use crop_box::{move_box, resize_box, CropBoxController};
pub use pan::{pan_transform, zoom_by, PanController};

/// Resize handle of the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeHandle {
    Left,
    Right,
    Top,
    Bottom,
    BottomRight,
}

/// Gesture started by a pointer-down on the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gesture {
    /// Drag the whole box.
    Move,
    /// Drag one of the resize handles.
    Resize(ResizeHandle),
}

/// What the preview should render for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePreview {
    pub crop_box: CropBox,
    pub transform: CropTransform,
}

/// A finished gesture persisted to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub platform: PlatformId,
    pub config: PlatformCropConfig,
}
