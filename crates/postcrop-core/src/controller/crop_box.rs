//! Crop box drag and resize.

use crate::error::CropError;
use crate::geometry::{box_to_transform, CropBox, CropTransform, Point, Size, MIN_BOX_SIZE};
use crate::platform::PlatformId;
use crate::state::{CropStateStore, PlatformCropConfig, PlatformCropState};

use super::{Commit, Gesture, LivePreview, ResizeHandle};

/// Translate a box by the pointer delta. Container bounds are not enforced.
pub fn move_box(initial: &CropBox, dx: f64, dy: f64) -> CropBox {
    CropBox::new(
        initial.width,
        initial.height,
        initial.left + dx,
        initial.top + dy,
    )
}

/// Resize a box by dragging `handle` by `(dx, dy)`.
///
/// Width and height never drop below [`MIN_BOX_SIZE`]. For the left and top
/// handles the opposite edge stays fixed.
pub fn resize_box(initial: &CropBox, handle: ResizeHandle, dx: f64, dy: f64) -> CropBox {
    let mut next = *initial;

    match handle {
        ResizeHandle::Left => {
            next.width = MIN_BOX_SIZE.max(initial.width - dx);
            next.left = initial.left + (initial.width - next.width);
        }
        ResizeHandle::Right => {
            next.width = MIN_BOX_SIZE.max(initial.width + dx);
        }
        ResizeHandle::Top => {
            next.height = MIN_BOX_SIZE.max(initial.height - dy);
            next.top = initial.top + (initial.height - next.height);
        }
        ResizeHandle::Bottom => {
            next.height = MIN_BOX_SIZE.max(initial.height + dy);
        }
        ResizeHandle::BottomRight => {
            next.width = MIN_BOX_SIZE.max(initial.width + dx);
            next.height = MIN_BOX_SIZE.max(initial.height + dy);
        }
    }

    next
}

#[derive(Debug, Clone)]
struct BoxDrag {
    platform: PlatformId,
    gesture: Gesture,
    epoch: u64,
    container: Size,
    start: Point,
    initial: LivePreview,
    current: LivePreview,
}

/// Pointer-driven crop box editing for one platform at a time.
#[derive(Debug, Clone, Default)]
pub struct CropBoxController {
    drag: Option<BoxDrag>,
}

impl CropBoxController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    /// Platform of the gesture in progress.
    pub fn platform(&self) -> Option<&PlatformId> {
        self.drag.as_ref().map(|d| &d.platform)
    }

    /// Start a gesture on `state` at container-local `pointer`.
    ///
    /// A gesture already in progress is replaced without committing it.
    pub fn pointer_down(
        &mut self,
        state: &PlatformCropState,
        gesture: Gesture,
        pointer: Point,
    ) -> LivePreview {
        let initial = LivePreview {
            crop_box: state.crop_box,
            transform: state.transform,
        };
        self.drag = Some(BoxDrag {
            platform: state.platform.clone(),
            gesture,
            epoch: state.epoch(),
            container: state.container,
            start: pointer,
            initial,
            current: initial,
        });
        initial
    }

    /// Update the gesture; returns the preview to render, or `None` when idle.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<LivePreview> {
        let drag = self.drag.as_mut()?;
        let dx = pointer.x - drag.start.x;
        let dy = pointer.y - drag.start.y;

        let crop_box = match drag.gesture {
            Gesture::Move => move_box(&drag.initial.crop_box, dx, dy),
            Gesture::Resize(handle) => resize_box(&drag.initial.crop_box, handle, dx, dy),
        };
        drag.current = LivePreview {
            crop_box,
            transform: box_to_transform(&crop_box, drag.container),
        };
        Some(drag.current)
    }

    /// Finish the gesture and persist box and transform to the store.
    ///
    /// Returns `Ok(None)` when no gesture was active, or when the state the
    /// gesture started on was discarded mid-gesture (new image attached);
    /// the edit is then dropped, even if the platform was re-seeded since.
    pub fn pointer_up(&mut self, store: &mut CropStateStore) -> Result<Option<Commit>, CropError> {
        let Some(drag) = self.drag.take() else {
            return Ok(None);
        };
        if !store.is_current(&drag.platform, drag.epoch) {
            log::warn!("dropping crop edit for {}: state was discarded", drag.platform);
            return Ok(None);
        }

        let config = PlatformCropConfig {
            transform: drag.current.transform,
            crop_box: drag.current.crop_box,
        };
        let committed = store.commit(&drag.platform, config)?.config();

        Ok(Some(Commit {
            platform: drag.platform,
            config: committed,
        }))
    }

    /// Abort the gesture; returns the pre-gesture preview to restore.
    pub fn cancel(&mut self) -> Option<LivePreview> {
        self.drag.take().map(|d| d.initial)
    }

    /// Transform shown for the gesture in progress.
    pub fn current_transform(&self) -> Option<CropTransform> {
        self.drag.as_ref().map(|d| d.current.transform)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn handle() -> impl Strategy<Value = ResizeHandle> {
        prop_oneof![
            Just(ResizeHandle::Left),
            Just(ResizeHandle::Right),
            Just(ResizeHandle::Top),
            Just(ResizeHandle::Bottom),
            Just(ResizeHandle::BottomRight),
        ]
    }

    proptest! {
        #[test]
        fn resize_never_below_floor(
            w in 50.0f64..400.0,
            h in 50.0f64..400.0,
            left in -100.0f64..400.0,
            top in -100.0f64..400.0,
            dx in -2000.0f64..2000.0,
            dy in -2000.0f64..2000.0,
            handle in handle(),
        ) {
            let r = resize_box(&CropBox::new(w, h, left, top), handle, dx, dy);
            prop_assert!(r.width >= MIN_BOX_SIZE);
            prop_assert!(r.height >= MIN_BOX_SIZE);
        }

        #[test]
        fn left_and_top_handles_fix_opposite_edge(
            w in 50.0f64..400.0,
            h in 50.0f64..400.0,
            dx in -500.0f64..500.0,
            dy in -500.0f64..500.0,
        ) {
            let b = CropBox::new(w, h, 20.0, 30.0);
            let l = resize_box(&b, ResizeHandle::Left, dx, dy);
            let t = resize_box(&b, ResizeHandle::Top, dx, dy);
            prop_assert!((l.right() - b.right()).abs() < 1e-9);
            prop_assert!((t.bottom() - b.bottom()).abs() < 1e-9);
        }
    }
}
