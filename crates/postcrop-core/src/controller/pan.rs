//! Direct pan and zoom of the image (modal editor).

use crate::error::CropError;
use crate::geometry::{clamp_offset, clamp_zoom, CropTransform, Point, Size, EPSILON};
use crate::platform::PlatformId;
use crate::state::{CropStateStore, PlatformCropConfig, PlatformCropState};

use super::Commit;

/// Shift the offsets by a pointer delta in container px, clamped.
pub fn pan_transform(initial: &CropTransform, container: Size, dx: f64, dy: f64) -> CropTransform {
    CropTransform {
        zoom: initial.zoom,
        offset_x: clamp_offset(initial.offset_x + dx / container.width.max(EPSILON) * 100.0),
        offset_y: clamp_offset(initial.offset_y + dy / container.height.max(EPSILON) * 100.0),
    }
}

/// Step the zoom by `delta` (wheel or pinch), clamped to `[1, 3]`.
pub fn zoom_by(transform: &CropTransform, delta: f64) -> CropTransform {
    CropTransform {
        zoom: clamp_zoom(transform.zoom + delta),
        ..*transform
    }
}

#[derive(Debug, Clone)]
struct PanDrag {
    platform: PlatformId,
    epoch: u64,
    container: Size,
    start: Point,
    initial: CropTransform,
    current: CropTransform,
}

/// Pointer-driven panning of the image under a fixed viewport.
#[derive(Debug, Clone, Default)]
pub struct PanController {
    drag: Option<PanDrag>,
}

impl PanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    /// Platform of the pan in progress.
    pub fn platform(&self) -> Option<&PlatformId> {
        self.drag.as_ref().map(|d| &d.platform)
    }

    pub fn pointer_down(&mut self, state: &PlatformCropState, pointer: Point) -> CropTransform {
        self.drag = Some(PanDrag {
            platform: state.platform.clone(),
            epoch: state.epoch(),
            container: state.container,
            start: pointer,
            initial: state.transform,
            current: state.transform,
        });
        state.transform
    }

    pub fn pointer_move(&mut self, pointer: Point) -> Option<CropTransform> {
        let drag = self.drag.as_mut()?;
        drag.current = pan_transform(
            &drag.initial,
            drag.container,
            pointer.x - drag.start.x,
            pointer.y - drag.start.y,
        );
        Some(drag.current)
    }

    /// Persist the panned transform; the crop box is left as stored.
    ///
    /// A pan whose state was discarded (new image attached) is dropped.
    pub fn pointer_up(&mut self, store: &mut CropStateStore) -> Result<Option<Commit>, CropError> {
        let Some(drag) = self.drag.take() else {
            return Ok(None);
        };
        if !store.is_current(&drag.platform, drag.epoch) {
            log::warn!("dropping pan for {}: state was discarded", drag.platform);
            return Ok(None);
        }

        let state = store.set_transform(&drag.platform, drag.current)?;
        Ok(Some(commit_of(state)))
    }

    pub fn cancel(&mut self) -> Option<CropTransform> {
        self.drag.take().map(|d| d.initial)
    }

    /// Apply a zoom step to a platform outside of any drag.
    pub fn zoom(
        &self,
        store: &mut CropStateStore,
        platform: &PlatformId,
        delta: f64,
    ) -> Result<Commit, CropError> {
        let current = store
            .state(platform)
            .map(|s| s.transform)
            .ok_or_else(|| CropError::InvalidState(platform.clone()))?;
        let state = store.set_transform(platform, zoom_by(&current, delta))?;
        Ok(commit_of(state))
    }
}

fn commit_of(state: &PlatformCropState) -> Commit {
    Commit {
        platform: state.platform.clone(),
        config: PlatformCropConfig {
            transform: state.transform,
            crop_box: state.crop_box,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::platform::{PlatformSpec, PlatformTable};

    fn store() -> CropStateStore {
        let mut table = PlatformTable::empty();
        table.insert(PlatformSpec::new("wide", "Wide", 400, 200));
        let mut store = CropStateStore::new(EngineConfig::default());
        store.select_platforms(&["wide".into()], &table).unwrap();
        store
    }

    #[test]
    fn test_pan_transform_percent_of_container() {
        let t = pan_transform(&CropTransform::default(), Size::new(400.0, 200.0), 40.0, -20.0);
        assert_eq!(t, CropTransform::new(1.0, 10.0, -10.0));
    }

    #[test]
    fn test_pan_transform_clamps() {
        let start = CropTransform::new(2.0, 90.0, 0.0);
        let t = pan_transform(&start, Size::new(100.0, 100.0), 500.0, -500.0);
        assert_eq!(t, CropTransform::new(2.0, 100.0, -100.0));
    }

    #[test]
    fn test_pan_transform_zero_container() {
        let t = pan_transform(&CropTransform::default(), Size::new(0.0, 0.0), 1.0, 1.0);
        assert_eq!(t.offset_x, 100.0);
        assert!(t.offset_y.is_finite());
    }

    #[test]
    fn test_zoom_by_clamps() {
        let t = CropTransform::new(2.5, 5.0, -5.0);
        assert_eq!(zoom_by(&t, 1.0), CropTransform::new(3.0, 5.0, -5.0));
        assert_eq!(zoom_by(&t, -4.0), CropTransform::new(1.0, 5.0, -5.0));
        assert_eq!(zoom_by(&t, 0.25).zoom, 2.75);
    }

    #[test]
    fn test_drag_and_commit() {
        let mut store = store();
        let state = store.state(&"wide".into()).unwrap().clone();
        let mut pan = PanController::new();

        pan.pointer_down(&state, Point::new(100.0, 100.0));
        let live = pan.pointer_move(Point::new(60.0, 100.0)).unwrap();
        assert_eq!(live.offset_x, -10.0);

        let commit = pan.pointer_up(&mut store).unwrap().unwrap();
        assert_eq!(commit.config.transform, live);
        assert_eq!(commit.config.crop_box, state.crop_box);
        assert_eq!(store.state(&"wide".into()).unwrap().transform, live);
    }

    #[test]
    fn test_cancel() {
        let mut store = store();
        let state = store.state(&"wide".into()).unwrap().clone();
        let mut pan = PanController::new();

        pan.pointer_down(&state, Point::new(0.0, 0.0));
        pan.pointer_move(Point::new(80.0, 0.0));
        assert_eq!(pan.cancel(), Some(state.transform));
        assert!(!pan.is_active());
        assert_eq!(pan.pointer_up(&mut store).unwrap(), None);
    }

    #[test]
    fn test_pointer_up_after_reseed_drops_pan() {
        let mut store = store();
        let p = PlatformId::from("wide");
        let state = store.state(&p).unwrap().clone();
        let mut pan = PanController::new();

        pan.pointer_down(&state, Point::new(0.0, 0.0));
        pan.pointer_move(Point::new(120.0, 0.0));
        assert_eq!(pan.platform(), Some(&p));

        let mut table = PlatformTable::empty();
        table.insert(PlatformSpec::new("wide", "Wide", 400, 200));
        store.clear();
        store.select_platforms(&[p.clone()], &table).unwrap();

        assert_eq!(pan.pointer_up(&mut store).unwrap(), None);
        assert!(store.state(&p).unwrap().transform.is_identity());
    }

    #[test]
    fn test_zoom_writes_store() {
        let mut store = store();
        let pan = PanController::new();
        let commit = pan.zoom(&mut store, &"wide".into(), 0.5).unwrap();
        assert_eq!(commit.config.transform.zoom, 1.5);
        assert_eq!(store.state(&"wide".into()).unwrap().transform.zoom, 1.5);

        let missing = pan.zoom(&mut store, &"nope".into(), 0.5);
        assert!(matches!(missing, Err(CropError::InvalidState(_))));
    }
}
