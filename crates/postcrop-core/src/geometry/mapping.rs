//! Forward (crop box to transform) and reverse (transform to source pixels)
//! mappings.
//!
//! # Algorithm
//!
//! Forward, for a crop box `B` in a container `(W, H)`:
//! ```text
//! zoom    = clamp(max(W / B.width, H / B.height, 1), 1, 3)
//! delta   = center(B) - (W/2, H/2)
//! offset% = clamp(-(delta / (W, H)) * 100 * zoom, -100, 100)
//! ```
//!
//! Reverse, for a rectangle `R` in preview (screen) space:
//! ```text
//! c       = center(R) - (W/2, H/2)            relative to the origin
//! c'      = c - offset% * (W, H) / 100        undo translate
//! u       = c' / zoom + (W/2, H/2)            undo scale
//! source  = (u - coverOffset) * coverScale    undo object-cover
//! size    = R.size * coverScale / zoom
//! ```
//! followed by a clamp that shifts (and only if unavoidable shrinks) the
//! rectangle into the image bounds.

use super::{
    clamp_offset, clamp_zoom, CoverFit, CropBox, CropTransform, Point, Size, SourceRect,
    EPSILON, MIN_ZOOM,
};

/// Derive the preview transform that makes `crop_box` fill the container.
///
/// Moving the box right shifts the image left (negative offset) so the box
/// content stays centered in the preview.
pub fn box_to_transform(crop_box: &CropBox, container: Size) -> CropTransform {
    let container = container.guarded();

    let zoom = clamp_zoom(
        (container.width / crop_box.width.max(EPSILON))
            .max(container.height / crop_box.height.max(EPSILON))
            .max(MIN_ZOOM),
    );

    let box_center = crop_box.center();
    let container_center = container.center();
    let dx = box_center.x - container_center.x;
    let dy = box_center.y - container_center.y;

    CropTransform {
        zoom,
        offset_x: clamp_offset(-(dx / container.width) * 100.0 * zoom),
        offset_y: clamp_offset(-(dy / container.height) * 100.0 * zoom),
    }
}

/// Map a rectangle drawn over the transformed preview to source pixels.
///
/// `rect` is in container space as seen on screen, i.e. after `transform` has
/// been applied to the displayed image. The returned rectangle always lies
/// inside the image and is at least 1x1 source px.
pub fn map_screen_rect(
    image: Size,
    container: Size,
    transform: &CropTransform,
    rect: &CropBox,
) -> SourceRect {
    let fit = CoverFit::compute(image, container);
    let container = container.guarded();
    let zoom = transform.zoom.max(EPSILON);
    let origin = container.center();

    let rect_center = rect.center();
    let translate_x = transform.offset_x * container.width / 100.0;
    let translate_y = transform.offset_y * container.height / 100.0;

    let untransformed = Point::new(
        (rect_center.x - origin.x - translate_x) / zoom + origin.x,
        (rect_center.y - origin.y - translate_y) / zoom + origin.y,
    );
    let source_center = fit.to_source(untransformed);

    clamp_to_image(
        source_center,
        rect.width * fit.scale_x / zoom,
        rect.height * fit.scale_y / zoom,
        image,
    )
}

/// Source pixels shown by the preview viewport of a platform.
///
/// This is exactly the region the preview displays scaled to fill the
/// container, so rasterizing it reproduces the preview.
pub fn source_rect(image: Size, container: Size, transform: &CropTransform) -> SourceRect {
    map_screen_rect(image, container, transform, &CropBox::covering(container))
}

/// Source pixels under a crop box drawn over the untransformed image.
pub fn box_to_source_rect(image: Size, container: Size, crop_box: &CropBox) -> SourceRect {
    map_screen_rect(image, container, &CropTransform::default(), crop_box)
}

/// Shift a rectangle into `[0, image.width] x [0, image.height]`.
///
/// The size is only reduced when it exceeds the image itself.
fn clamp_to_image(center: Point, width: f64, height: f64, image: Size) -> SourceRect {
    let width = width.max(1.0).min(image.width.max(1.0));
    let height = height.max(1.0).min(image.height.max(1.0));

    let x = (center.x - width / 2.0).min(image.width - width).max(0.0);
    let y = (center.y - height / 2.0).min(image.height - height).max(0.0);

    SourceRect {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_forward_full_box_is_identity() {
        let container = Size::new(500.0, 500.0);
        let t = box_to_transform(&CropBox::covering(container), container);
        assert!(t.is_identity());
    }

    #[test]
    fn test_forward_centered_half_box() {
        let container = Size::new(500.0, 500.0);
        let t = box_to_transform(&CropBox::new(250.0, 250.0, 125.0, 125.0), container);
        assert!(approx(t.zoom, 2.0));
        assert!(approx(t.offset_x, 0.0));
        assert!(approx(t.offset_y, 0.0));
    }

    #[test]
    fn test_forward_centered_box_has_unsigned_offsets() {
        let container = Size::new(500.0, 500.0);
        let t = box_to_transform(&CropBox::new(250.0, 250.0, 125.0, 125.0), container);
        assert!(t.offset_x.is_sign_positive());
        assert!(t.offset_y.is_sign_positive());
        assert_eq!(t.css(), "translate(0%, 0%) scale(2)");
    }

    #[test]
    fn test_forward_box_right_shifts_image_left() {
        let container = Size::new(400.0, 400.0);
        // Center at (300, 200): 100px right of the container center
        let t = box_to_transform(&CropBox::new(200.0, 200.0, 200.0, 100.0), container);
        assert!(approx(t.zoom, 2.0));
        assert!(approx(t.offset_x, -50.0));
        assert!(approx(t.offset_y, 0.0));
    }

    #[test]
    fn test_forward_uses_larger_ratio() {
        let container = Size::new(400.0, 200.0);
        let t = box_to_transform(&CropBox::centered(container, 200.0, 150.0), container);
        // W / w = 2.0 beats H / h = 1.33
        assert!(approx(t.zoom, 2.0));
    }

    #[test]
    fn test_forward_zoom_clamped() {
        let container = Size::new(500.0, 500.0);
        let t = box_to_transform(&CropBox::centered(container, 50.0, 50.0), container);
        assert_eq!(t.zoom, 3.0);

        let t = box_to_transform(&CropBox::centered(container, 900.0, 900.0), container);
        assert_eq!(t.zoom, 1.0);
    }

    #[test]
    fn test_forward_offset_clamped() {
        let container = Size::new(400.0, 400.0);
        let t = box_to_transform(&CropBox::new(100.0, 100.0, 1000.0, -1000.0), container);
        assert_eq!(t.offset_x, -100.0);
        assert_eq!(t.offset_y, 100.0);
    }

    #[test]
    fn test_identity_crop_is_cover_region() {
        // 2:1 image in a square container: cover fits by height
        let image = Size::new(2000.0, 1000.0);
        let container = Size::new(500.0, 500.0);
        let rect = source_rect(image, container, &CropTransform::default());

        assert!(approx(rect.x, 500.0));
        assert!(approx(rect.y, 0.0));
        assert!(approx(rect.width, 1000.0));
        assert!(approx(rect.height, 1000.0));
    }

    #[test]
    fn test_identity_crop_matches_box_over_container() {
        let image = Size::new(1200.0, 1800.0);
        let container = Size::new(400.0, 300.0);
        let viewport = source_rect(image, container, &CropTransform::default());
        let boxed = box_to_source_rect(image, container, &CropBox::covering(container));
        assert_eq!(viewport, boxed);
    }

    #[test]
    fn test_canonical_scenario() {
        let image = Size::new(2000.0, 1000.0);
        let container = Size::new(500.0, 500.0);
        let crop_box = CropBox::new(250.0, 250.0, 125.0, 125.0);

        let transform = box_to_transform(&crop_box, container);
        assert!(approx(transform.zoom, 2.0));

        let rect = source_rect(image, container, &transform);
        // Centered on the image center, 500 source px high and wide
        assert!(approx(rect.center().x, 1000.0));
        assert!(approx(rect.center().y, 500.0));
        assert!(approx(rect.height, 500.0));
        assert!(approx(rect.width, 500.0));
        assert!(approx(rect.x, 750.0));
        assert!(approx(rect.y, 250.0));

        // The box over the untransformed image covers the same pixels
        let boxed = box_to_source_rect(image, container, &crop_box);
        assert!(approx(boxed.x, rect.x));
        assert!(approx(boxed.height, rect.height));
    }

    #[test]
    fn test_off_center_round_trip() {
        let image = Size::new(1600.0, 1200.0);
        let container = Size::new(400.0, 400.0);
        let crop_box = CropBox::new(160.0, 160.0, 20.0, 200.0);

        let transform = box_to_transform(&crop_box, container);
        let rect = source_rect(image, container, &transform);
        let expected = box_to_source_rect(image, container, &crop_box);

        assert!(approx(rect.center().x, expected.center().x));
        assert!(approx(rect.center().y, expected.center().y));
    }

    #[test]
    fn test_screen_rect_under_zoom() {
        let image = Size::new(1000.0, 1000.0);
        let container = Size::new(500.0, 500.0);
        let transform = CropTransform::new(2.0, 0.0, 0.0);
        // Half the screen at zoom 2 is a quarter of the image side
        let rect = map_screen_rect(
            image,
            container,
            &transform,
            &CropBox::centered(container, 250.0, 250.0),
        );
        assert!(approx(rect.width, 250.0));
        assert!(approx(rect.x, 375.0));
    }

    #[test]
    fn test_translate_moves_viewport() {
        let image = Size::new(1000.0, 1000.0);
        let container = Size::new(500.0, 500.0);
        // Image shifted right by 10% of 500px = 50 screen px; at zoom 2 the
        // viewport center moves 25 displayed px left = 50 source px
        let transform = CropTransform::new(2.0, 10.0, 0.0);
        let rect = source_rect(image, container, &transform);
        assert!(approx(rect.center().x, 450.0));
        assert!(approx(rect.center().y, 500.0));
    }

    #[test]
    fn test_clamp_shifts_without_shrinking() {
        let image = Size::new(1000.0, 1000.0);
        let container = Size::new(500.0, 500.0);
        // Pushed far left: the viewport would start before x = 0
        let transform = CropTransform::new(1.5, 100.0, 0.0);
        let rect = source_rect(image, container, &transform);

        assert!(approx(rect.x, 0.0));
        assert!(approx(rect.width, 1000.0 / 1.5));
        assert!(rect.is_within(image));
    }

    #[test]
    fn test_oversized_rect_clamps_size() {
        let image = Size::new(100.0, 100.0);
        let container = Size::new(100.0, 100.0);
        let rect = map_screen_rect(
            image,
            container,
            &CropTransform::default(),
            &CropBox::new(400.0, 400.0, -150.0, -150.0),
        );
        assert_eq!(rect, SourceRect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_degenerate_image_yields_unit_rect() {
        let rect = source_rect(
            Size::new(0.0, 0.0),
            Size::new(500.0, 500.0),
            &CropTransform::default(),
        );
        assert!(rect.x.is_finite() && rect.y.is_finite());
        assert_eq!(rect.width, 1.0);
        assert_eq!(rect.height, 1.0);
    }

    #[test]
    fn test_degenerate_container_is_finite() {
        let rect = source_rect(
            Size::new(640.0, 480.0),
            Size::new(0.0, 0.0),
            &CropTransform::new(2.0, 50.0, -50.0),
        );
        assert!(rect.x.is_finite() && rect.width.is_finite());
        assert!(rect.is_within(Size::new(640.0, 480.0)));
    }

    #[test]
    fn test_zero_sized_box_forward_is_finite() {
        let t = box_to_transform(&CropBox::new(0.0, 0.0, 10.0, 10.0), Size::new(300.0, 300.0));
        assert_eq!(t.zoom, 3.0);
        assert!(t.offset_x.is_finite());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
