//! Crop state store.
//!
//! Holds one [`PlatformCropState`] per platform of the current editing
//! session. Every setter replaces the platform's state with a new value;
//! other platforms' entries are never touched.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::CropError;
use crate::geometry::{clamp_offset, clamp_zoom, CropBox, CropTransform, Size};
use crate::platform::{display_size, PlatformGeometry, PlatformId};

/// Reference to a connected social account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: String,
    pub handle: String,
}

/// Offset axis of a [`CropTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "offsetX")]
    X,
    #[serde(rename = "offsetY")]
    Y,
}

/// Editing state of one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCropState {
    pub platform: PlatformId,
    /// Preview container size in logical px.
    pub container: Size,
    pub transform: CropTransform,
    pub crop_box: CropBox,
    pub is_connected: bool,
    pub bound_account: Option<AccountRef>,
    #[serde(skip)]
    epoch: u64,
}

impl PlatformCropState {
    /// Store epoch the state was created in; bumped by [`CropStateStore::clear`].
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Serializable transform + crop box.
    pub fn config(&self) -> PlatformCropConfig {
        PlatformCropConfig {
            transform: self.transform,
            crop_box: self.crop_box,
        }
    }
}

/// Persistable part of a platform's crop state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCropConfig {
    pub transform: CropTransform,
    pub crop_box: CropBox,
}

/// Snapshot of every selected platform's crop config.
pub type PlatformCropConfigs = BTreeMap<PlatformId, PlatformCropConfig>;

/// Keyed store of per-platform crop states.
#[derive(Debug, Clone)]
pub struct CropStateStore {
    config: EngineConfig,
    states: HashMap<PlatformId, PlatformCropState>,
    selected: Vec<PlatformId>,
    epoch: u64,
}

impl CropStateStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
            selected: Vec::new(),
            epoch: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Existing state for a platform, if any.
    pub fn state(&self, platform: &PlatformId) -> Option<&PlatformCropState> {
        self.states.get(platform)
    }

    /// Existing state, or a freshly initialized default for the platform.
    ///
    /// # Errors
    ///
    /// `CropError::UnknownPlatform` if the geometry table has no entry.
    pub fn get_state(
        &mut self,
        platform: &PlatformId,
        geometry: &dyn PlatformGeometry,
    ) -> Result<&PlatformCropState, CropError> {
        if !self.states.contains_key(platform) {
            let state = self.default_state(platform, geometry)?;
            self.states.insert(platform.clone(), state);
        }
        self.states
            .get(platform)
            .ok_or_else(|| CropError::InvalidState(platform.clone()))
    }

    /// Make `platforms` the selected set, seeding defaults for new entries.
    ///
    /// States of deselected platforms are retained so that reselecting a
    /// platform restores its crop; they are dropped with [`Self::clear`].
    pub fn select_platforms(
        &mut self,
        platforms: &[PlatformId],
        geometry: &dyn PlatformGeometry,
    ) -> Result<(), CropError> {
        // Validate everything before touching the selection
        for platform in platforms {
            if !self.states.contains_key(platform) && geometry.dimensions(platform).is_none() {
                return Err(CropError::UnknownPlatform(platform.clone()));
            }
        }

        let mut selected = Vec::with_capacity(platforms.len());
        for platform in platforms {
            self.get_state(platform, geometry)?;
            if !selected.contains(platform) {
                selected.push(platform.clone());
            }
        }
        self.selected = selected;
        Ok(())
    }

    /// Currently selected platforms in selection order.
    pub fn selected(&self) -> &[PlatformId] {
        &self.selected
    }

    pub fn is_selected(&self, platform: &PlatformId) -> bool {
        self.selected.contains(platform)
    }

    /// Check that `platform` still has the state seeded in `epoch`.
    ///
    /// False once the store was cleared, even if the platform has been
    /// re-seeded since.
    pub fn is_current(&self, platform: &PlatformId, epoch: u64) -> bool {
        self.states.get(platform).is_some_and(|s| s.epoch == epoch)
    }

    /// Set the zoom, clamped to `[1, 3]`.
    pub fn set_zoom(
        &mut self,
        platform: &PlatformId,
        value: f64,
    ) -> Result<&PlatformCropState, CropError> {
        self.replace(platform, |state| state.transform.zoom = clamp_zoom(value))
    }

    /// Set one offset axis, clamped to `[-100, 100]`.
    pub fn set_offset(
        &mut self,
        platform: &PlatformId,
        axis: Axis,
        value: f64,
    ) -> Result<&PlatformCropState, CropError> {
        let value = clamp_offset(value);
        self.replace(platform, |state| match axis {
            Axis::X => state.transform.offset_x = value,
            Axis::Y => state.transform.offset_y = value,
        })
    }

    /// Replace the whole transform, clamping every component.
    pub fn set_transform(
        &mut self,
        platform: &PlatformId,
        transform: CropTransform,
    ) -> Result<&PlatformCropState, CropError> {
        let transform = transform.clamped();
        self.replace(platform, |state| state.transform = transform)
    }

    /// Store a crop box as given; size floors are the caller's concern.
    pub fn set_crop_box(
        &mut self,
        platform: &PlatformId,
        crop_box: CropBox,
    ) -> Result<&PlatformCropState, CropError> {
        self.replace(platform, |state| state.crop_box = crop_box)
    }

    /// Store crop box and transform as one mutation.
    pub fn commit(
        &mut self,
        platform: &PlatformId,
        config: PlatformCropConfig,
    ) -> Result<&PlatformCropState, CropError> {
        let transform = config.transform.clamped();
        self.replace(platform, |state| {
            state.crop_box = config.crop_box;
            state.transform = transform;
        })
    }

    /// Bind or unbind the connected account; has no effect on geometry.
    pub fn set_bound_account(
        &mut self,
        platform: &PlatformId,
        account: Option<AccountRef>,
    ) -> Result<&PlatformCropState, CropError> {
        self.replace(platform, |state| {
            state.is_connected = account.is_some();
            state.bound_account = account;
        })
    }

    /// Restore the default transform and crop box of a platform.
    pub fn reset(&mut self, platform: &PlatformId) -> Result<&PlatformCropState, CropError> {
        let (transform, crop_box) = {
            let state = self.require(platform)?;
            (CropTransform::default(), self.default_box(state.container))
        };
        self.replace(platform, |state| {
            state.transform = transform;
            state.crop_box = crop_box;
        })
    }

    /// Drop every state and the selection, starting a new epoch.
    pub fn clear(&mut self) {
        self.states.clear();
        self.selected.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Crop configs of the selected platforms.
    pub fn snapshot(&self) -> PlatformCropConfigs {
        self.selected
            .iter()
            .filter_map(|p| self.states.get(p).map(|s| (p.clone(), s.config())))
            .collect()
    }

    fn require(&self, platform: &PlatformId) -> Result<&PlatformCropState, CropError> {
        self.states.get(platform).ok_or_else(|| {
            log::error!("no crop state registered for platform {platform}");
            CropError::InvalidState(platform.clone())
        })
    }

    fn replace(
        &mut self,
        platform: &PlatformId,
        mutate: impl FnOnce(&mut PlatformCropState),
    ) -> Result<&PlatformCropState, CropError> {
        let mut next = self.require(platform)?.clone();
        mutate(&mut next);

        log::debug!(
            "crop state {platform}: zoom {:.3} offset ({:.2}, {:.2}) box {:.1}x{:.1}+{:.1}+{:.1}",
            next.transform.zoom,
            next.transform.offset_x,
            next.transform.offset_y,
            next.crop_box.width,
            next.crop_box.height,
            next.crop_box.left,
            next.crop_box.top
        );

        self.states.insert(platform.clone(), next);
        self.require(platform)
    }

    fn default_state(
        &self,
        platform: &PlatformId,
        geometry: &dyn PlatformGeometry,
    ) -> Result<PlatformCropState, CropError> {
        let spec = geometry
            .dimensions(platform)
            .ok_or_else(|| CropError::UnknownPlatform(platform.clone()))?;
        let container = display_size(&spec, &self.config);

        Ok(PlatformCropState {
            platform: platform.clone(),
            container,
            transform: CropTransform::default(),
            crop_box: self.default_box(container),
            is_connected: false,
            bound_account: None,
            epoch: self.epoch,
        })
    }

    /// Centered box at the configured fraction of the container, capped.
    fn default_box(&self, container: Size) -> CropBox {
        let width = (container.width * self.config.default_box_fraction)
            .min(self.config.default_box_max_width);
        let height = (container.height * self.config.default_box_fraction)
            .min(self.config.default_box_max_height);
        CropBox::centered(container, width, height)
    }
}
