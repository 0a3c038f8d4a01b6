//! Crop session WASM bindings.
//!
//! `JsCropSession` bundles the core session with the crop box and pan
//! controllers, so the editor forwards raw pointer events and renders what
//! comes back.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsCropSession();
//! session.select_platforms(['instagram', 'twitter']);
//! session.attach_image(bytes);
//!
//! box.onpointerdown = (e) => render(session.pointer_down('instagram', 'move', e.x, e.y));
//! box.onpointermove = (e) => render(session.pointer_move(e.x, e.y));
//! box.onpointerup = () => session.pointer_up();
//!
//! const { croppedImages, notReady } = session.crop_all();
//! ```

use std::collections::BTreeMap;

use postcrop_core::controller::{Commit, CropBoxController, Gesture, PanController, ResizeHandle};
use postcrop_core::geometry::Point;
use postcrop_core::platform::{PlatformId, PlatformSpec, PlatformTable};
use postcrop_core::session::{CropSession, ImageSource};
use postcrop_core::state::{AccountRef, Axis};
use postcrop_core::{CropError, EngineConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{filter_from_u8, js_error, JsRasterResult};

/// Crop editing session for one post draft.
#[wasm_bindgen]
pub struct JsCropSession {
    session: CropSession,
    crop_box: CropBoxController,
    pan: PanController,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsBatch {
    cropped_images: BTreeMap<PlatformId, String>,
    not_ready: BTreeMap<PlatformId, String>,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Session with the built-in platform table and default config
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::from_session(CropSession::with_defaults())
    }

    /// Session from a partial `EngineConfig` object
    pub fn from_config(config: JsValue) -> Result<JsCropSession, JsValue> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config).map_err(js_error)?;
        let session = CropSession::new(PlatformTable::default(), config).map_err(js_error)?;
        Ok(Self::from_session(session))
    }

    /// Session with default config and the given filter (0 nearest, 1 bilinear, 2 lanczos3)
    pub fn with_filter(filter: u8) -> Result<JsCropSession, JsValue> {
        let config = EngineConfig {
            filter: filter_from_u8(filter),
            ..EngineConfig::default()
        };
        let session = CropSession::new(PlatformTable::default(), config).map_err(js_error)?;
        Ok(Self::from_session(session))
    }

    /// Add or replace a platform in the geometry table
    pub fn register_platform(&mut self, id: &str, label: &str, width: u32, height: u32) {
        self.session
            .geometry_mut()
            .insert(PlatformSpec::new(id, label, width, height));
    }

    /// Set the selected platforms (array of ids)
    pub fn select_platforms(&mut self, platforms: js_sys::Array) -> Result<(), JsValue> {
        let ids = platforms
            .iter()
            .map(|v| {
                v.as_string()
                    .map(PlatformId::from)
                    .ok_or_else(|| JsValue::from_str("Platform ids must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.select(&ids).map_err(js_error)
    }

    /// Attach and decode a new source image; resets every platform's crop
    pub fn attach_image(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.crop_box.cancel();
        self.pan.cancel();

        self.session.attach_image(ImageSource::blob(bytes.clone()));
        match self.session.image_request() {
            Some(request) => self
                .session
                .install_image(request.decode_with(&bytes))
                .map_err(js_error),
            None => Err(JsValue::from_str("No pending image")),
        }
    }

    /// Current crop state of a platform
    pub fn state(&mut self, platform: &str) -> Result<JsValue, JsValue> {
        let state = self.session.get_state(&platform.into()).map_err(js_error)?;
        to_js(state)
    }

    pub fn set_zoom(&mut self, platform: &str, value: f64) -> Result<JsValue, JsValue> {
        let state = self
            .session
            .store_mut()
            .set_zoom(&platform.into(), value)
            .map_err(js_error)?;
        to_js(state)
    }

    /// Set `offsetX` or `offsetY`
    pub fn set_offset(
        &mut self,
        platform: &str,
        axis: &str,
        value: f64,
    ) -> Result<JsValue, JsValue> {
        let axis = parse_axis(axis)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown axis: {axis}")))?;
        let state = self
            .session
            .store_mut()
            .set_offset(&platform.into(), axis, value)
            .map_err(js_error)?;
        to_js(state)
    }

    pub fn reset_platform(&mut self, platform: &str) -> Result<JsValue, JsValue> {
        let state = self.session.reset_platform(&platform.into()).map_err(js_error)?;
        to_js(state)
    }

    /// Bind an `{ id, handle }` account, or unbind with `null`
    pub fn set_connected_account(
        &mut self,
        platform: &str,
        account: JsValue,
    ) -> Result<(), JsValue> {
        let account: Option<AccountRef> =
            serde_wasm_bindgen::from_value(account).map_err(js_error)?;
        self.session
            .set_connected_account(&platform.into(), account)
            .map_err(js_error)?;
        Ok(())
    }

    /// Start a crop box gesture: `move`, `left`, `right`, `top`, `bottom` or `bottomRight`
    pub fn pointer_down(
        &mut self,
        platform: &str,
        gesture: &str,
        x: f64,
        y: f64,
    ) -> Result<JsValue, JsValue> {
        let gesture = parse_gesture(gesture)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown gesture: {gesture}")))?;
        let state = self.session.get_state(&platform.into()).map_err(js_error)?;
        let preview = self.crop_box.pointer_down(state, gesture, Point::new(x, y));
        to_js(&preview)
    }

    /// Live preview for the pointer position, or `null` when idle
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        match self.crop_box.pointer_move(Point::new(x, y)) {
            Some(preview) => to_js(&preview),
            None => Ok(JsValue::NULL),
        }
    }

    /// Commit the gesture and regenerate that platform's image
    pub fn pointer_up(&mut self) -> Result<JsValue, JsValue> {
        let commit = self.crop_box.pointer_up(self.session.store_mut()).map_err(js_error)?;
        self.after_commit(commit)
    }

    /// Abort the gesture; returns the preview to restore, or `null`
    pub fn pointer_cancel(&mut self) -> Result<JsValue, JsValue> {
        match self.crop_box.cancel() {
            Some(preview) => to_js(&preview),
            None => Ok(JsValue::NULL),
        }
    }

    /// Start panning the image of a platform
    pub fn pan_down(&mut self, platform: &str, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let state = self.session.get_state(&platform.into()).map_err(js_error)?;
        let transform = self.pan.pointer_down(state, Point::new(x, y));
        to_js(&transform)
    }

    pub fn pan_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        match self.pan.pointer_move(Point::new(x, y)) {
            Some(transform) => to_js(&transform),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn pan_up(&mut self) -> Result<JsValue, JsValue> {
        let commit = self.pan.pointer_up(self.session.store_mut()).map_err(js_error)?;
        self.after_commit(commit)
    }

    /// Step the zoom of a platform (wheel or pinch)
    pub fn zoom_by(&mut self, platform: &str, delta: f64) -> Result<JsValue, JsValue> {
        let commit = self
            .pan
            .zoom(self.session.store_mut(), &platform.into(), delta)
            .map_err(js_error)?;
        self.after_commit(Some(commit))
    }

    /// CSS transform of a platform's preview image
    pub fn transform_css(&mut self, platform: &str) -> Result<String, JsValue> {
        let state = self.session.get_state(&platform.into()).map_err(js_error)?;
        Ok(state.transform.css())
    }

    /// Rasterize one platform
    pub fn crop_for_platform(&mut self, platform: &str) -> Result<JsRasterResult, JsValue> {
        self.session
            .rasterize(&platform.into())
            .map(JsRasterResult::from_result)
            .map_err(js_error)
    }

    /// Rasterize every selected platform: `{ croppedImages, notReady }`
    pub fn crop_all(&mut self) -> Result<JsValue, JsValue> {
        let platforms = self.session.store().selected().to_vec();
        let outcome = self.session.rasterize_all(&platforms);
        to_js(&JsBatch {
            cropped_images: outcome.cropped_images(),
            not_ready: outcome
                .not_ready
                .iter()
                .map(|(p, e)| (p.clone(), e.to_string()))
                .collect(),
        })
    }

    /// `{ [platform]: { transform, cropBox } }` for the draft
    pub fn platform_crop_configs(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.platform_crop_configs())
    }

    /// `{ [platform]: base64 }` of every up-to-date raster
    pub fn cropped_images(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.cropped_images())
    }

    /// Selected platforms without an up-to-date raster
    pub fn not_ready_platforms(&self) -> Vec<String> {
        self.session
            .not_ready_platforms()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl Default for JsCropSession {
    fn default() -> Self {
        Self::new()
    }
}

impl JsCropSession {
    fn from_session(session: CropSession) -> Self {
        Self {
            session,
            crop_box: CropBoxController::new(),
            pan: PanController::new(),
        }
    }

    /// Change the selection, abandoning gestures on platforms that left it.
    fn select(&mut self, ids: &[PlatformId]) -> Result<(), CropError> {
        self.session.select_platforms(ids)?;

        let deselected = |platform: Option<&PlatformId>| platform.is_some_and(|p| !ids.contains(p));
        if deselected(self.crop_box.platform()) {
            log::debug!("cancelling crop box gesture on deselected platform");
            self.crop_box.cancel();
        }
        if deselected(self.pan.platform()) {
            log::debug!("cancelling pan on deselected platform");
            self.pan.cancel();
        }
        Ok(())
    }

    /// Regenerate the committed platform; a failed raster leaves it not ready.
    fn after_commit(&mut self, commit: Option<Commit>) -> Result<JsValue, JsValue> {
        let Some(commit) = commit else {
            return Ok(JsValue::NULL);
        };
        if let Err(err) = self.session.rasterize(&commit.platform) {
            log::warn!("{} not ready after commit: {err}", commit.platform);
        }
        to_js(&commit)
    }
}

/// Serialize with maps as plain objects, as the editor expects.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn parse_gesture(name: &str) -> Option<Gesture> {
    let handle = match name {
        "move" => return Some(Gesture::Move),
        "left" => ResizeHandle::Left,
        "right" => ResizeHandle::Right,
        "top" => ResizeHandle::Top,
        "bottom" => ResizeHandle::Bottom,
        "bottomRight" => ResizeHandle::BottomRight,
        _ => return None,
    };
    Some(Gesture::Resize(handle))
}

fn parse_axis(name: &str) -> Option<Axis> {
    match name {
        "offsetX" | "x" => Some(Axis::X),
        "offsetY" | "y" => Some(Axis::Y),
        _ => None,
    }
}
