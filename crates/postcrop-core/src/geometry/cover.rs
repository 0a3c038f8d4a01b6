//! Object-cover fit of an image inside a container.

use super::{Point, Size};

/// Placement of an image scaled to cover a container, centered.
///
/// The image is scaled uniformly so that it fills the container on its
/// shorter relative dimension; the overflow on the other axis is split evenly
/// on both sides, which makes `offset` zero or negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    /// Size of the scaled image in container px.
    pub displayed: Size,
    /// Position of the scaled image's top-left corner in container px.
    pub offset: Point,
    /// Source px per displayed px, horizontally.
    pub scale_x: f64,
    /// Source px per displayed px, vertically.
    pub scale_y: f64,
}

impl CoverFit {
    /// Compute the cover placement of `image` inside `container`.
    ///
    /// Degenerate sizes are guarded: every denominator is floored at
    /// [`super::EPSILON`], so the result is always finite.
    pub fn compute(image: Size, container: Size) -> Self {
        let container = container.guarded();

        let displayed = if image.aspect() > container.aspect() {
            // Wider than the container: fit height, overflow horizontally
            Size::new(
                image.width * container.height / image.height.max(super::EPSILON),
                container.height,
            )
        } else {
            // Taller (or equal): fit width, overflow vertically
            Size::new(
                container.width,
                image.height * container.width / image.width.max(super::EPSILON),
            )
        };
        let displayed = displayed.guarded();

        Self {
            displayed,
            offset: Point::new(
                (container.width - displayed.width) / 2.0,
                (container.height - displayed.height) / 2.0,
            ),
            scale_x: image.width / displayed.width,
            scale_y: image.height / displayed.height,
        }
    }

    /// Map a point in untransformed container space to source px.
    pub fn to_source(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.offset.x) * self.scale_x,
            (point.y - self.offset.y) * self.scale_y,
        )
    }

    /// Map a source px point to untransformed container space.
    pub fn to_container(&self, point: Point) -> Point {
        Point::new(
            point.x / self.scale_x.max(super::EPSILON) + self.offset.x,
            point.y / self.scale_y.max(super::EPSILON) + self.offset.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_wide_image_in_square_container() {
        let fit = CoverFit::compute(Size::new(2000.0, 1000.0), Size::new(500.0, 500.0));
        assert!(approx(fit.displayed.width, 1000.0));
        assert!(approx(fit.displayed.height, 500.0));
        assert!(approx(fit.offset.x, -250.0));
        assert!(approx(fit.offset.y, 0.0));
        assert!(approx(fit.scale_x, 2.0));
        assert!(approx(fit.scale_y, 2.0));
    }

    #[test]
    fn test_tall_image_in_landscape_container() {
        let fit = CoverFit::compute(Size::new(600.0, 1200.0), Size::new(400.0, 200.0));
        assert!(approx(fit.displayed.width, 400.0));
        assert!(approx(fit.displayed.height, 800.0));
        assert!(approx(fit.offset.x, 0.0));
        assert!(approx(fit.offset.y, -300.0));
        assert!(approx(fit.scale_x, 1.5));
    }

    #[test]
    fn test_same_aspect_fills_exactly() {
        let fit = CoverFit::compute(Size::new(1080.0, 1350.0), Size::new(400.0, 500.0));
        assert!(approx(fit.displayed.width, 400.0));
        assert!(approx(fit.displayed.height, 500.0));
        assert!(approx(fit.offset.x, 0.0));
        assert!(approx(fit.offset.y, 0.0));
    }

    #[test]
    fn test_point_round_trip() {
        let fit = CoverFit::compute(Size::new(1920.0, 1080.0), Size::new(300.0, 300.0));
        let p = Point::new(123.0, 45.0);
        let back = fit.to_container(fit.to_source(p));
        assert!(approx(back.x, p.x));
        assert!(approx(back.y, p.y));
    }

    #[test]
    fn test_degenerate_image_is_finite() {
        let fit = CoverFit::compute(Size::new(0.0, 0.0), Size::new(500.0, 500.0));
        assert!(fit.displayed.width.is_finite());
        assert!(fit.displayed.height > 0.0);
        assert!(fit.scale_x.is_finite());
        assert!(fit.scale_y.is_finite());
        assert!(fit.offset.y.is_finite());
    }

    #[test]
    fn test_degenerate_container_is_finite() {
        let fit = CoverFit::compute(Size::new(100.0, 100.0), Size::new(0.0, 0.0));
        assert!(fit.scale_x.is_finite());
        assert!(fit.scale_y.is_finite());
    }
}
