//! Rasterization of a platform crop.
//!
//! The source rectangle computed by [`crate::geometry::source_rect`] is drawn
//! scaled into an output buffer the size of the platform's preview container
//! and encoded as PNG. Canonical publish resolution is applied downstream.

mod sample;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::encode::{encode_png, EncodeError};
use crate::geometry::{source_rect, Size, SourceRect};
use crate::platform::PlatformId;
use crate::state::PlatformCropState;

pub use sample::draw_region;

/// Resampling filter for drawing the source rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation at fractional source coordinates.
    Bilinear,
    /// Separable Lanczos3 at fractional source coordinates (highest quality).
    #[default]
    Lanczos3,
}

/// Encoded raster for one platform.
///
/// Immutable once created; a new result supersedes it whenever the
/// platform's crop state changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterResult {
    pub platform: PlatformId,
    /// PNG bytes.
    pub encoded_image: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RasterResult {
    /// PNG bytes as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.encoded_image)
    }

    /// PNG bytes as a `data:` URL usable as an `<img>` source.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}

/// Output buffer size for a container: rounded, at least 1x1.
pub fn output_size(container: Size) -> (u32, u32) {
    let round = |v: f64| {
        if v.is_finite() {
            v.round().clamp(1.0, u32::MAX as f64) as u32
        } else {
            1
        }
    };
    (round(container.width), round(container.height))
}

/// Rasterize the region a platform's preview shows.
pub fn rasterize(
    image: &DecodedImage,
    state: &PlatformCropState,
    filter: FilterType,
) -> Result<RasterResult, EncodeError> {
    let rect: SourceRect = source_rect(image.size(), state.container, &state.transform);
    let (width, height) = output_size(state.container);

    let drawn = draw_region(image, &rect, width, height, filter);
    let encoded_image = encode_png(&drawn.pixels, drawn.width, drawn.height)?;

    log::debug!(
        "rasterized {}: source {:.1}x{:.1}+{:.1}+{:.1} -> {}x{} ({} bytes)",
        state.platform,
        rect.width,
        rect.height,
        rect.x,
        rect.y,
        width,
        height,
        encoded_image.len()
    );

    Ok(RasterResult {
        platform: state.platform.clone(),
        encoded_image,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::geometry::{CropBox, CropTransform};
    use crate::platform::{PlatformSpec, PlatformTable};
    use crate::state::CropStateStore;

    fn striped_image(width: u32, height: u32) -> DecodedImage {
        // Left half red, right half blue
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn square_state(store: &mut CropStateStore) -> PlatformCropState {
        let mut table = PlatformTable::empty();
        table.insert(PlatformSpec::new("square", "Square", 100, 100));
        store.get_state(&"square".into(), &table).unwrap().clone()
    }

    #[test]
    fn test_output_size() {
        assert_eq!(output_size(Size::new(281.25, 500.0)), (281, 500));
        assert_eq!(output_size(Size::new(0.2, 0.0)), (1, 1));
        assert_eq!(output_size(Size::new(f64::NAN, 10.0)), (1, 10));
    }

    #[test]
    fn test_base64_and_data_url() {
        let result = RasterResult {
            platform: "p".into(),
            encoded_image: vec![1, 2, 3],
            width: 1,
            height: 1,
        };
        assert_eq!(result.to_base64(), "AQID");
        assert_eq!(result.data_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_rasterize_identity_has_container_size() {
        let mut store = CropStateStore::new(EngineConfig::default());
        let state = square_state(&mut store);
        let image = striped_image(200, 100);

        let result = rasterize(&image, &state, FilterType::Bilinear).unwrap();
        assert_eq!((result.width, result.height), (100, 100));

        let decoded = image::load_from_memory(&result.encoded_image)
            .unwrap()
            .into_rgba8();
        assert_eq!(decoded.dimensions(), (100, 100));
        // Cover crop of a 2:1 image shows the center: red left, blue right
        assert_eq!(decoded.get_pixel(10, 50).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(90, 50).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_rasterize_follows_box() {
        let mut store = CropStateStore::new(EngineConfig::default());
        let mut state = square_state(&mut store);
        let image = striped_image(200, 100);

        // Box over the left quarter of the container: only red remains
        state.crop_box = CropBox::new(50.0, 50.0, 0.0, 25.0);
        state.transform = crate::geometry::box_to_transform(&state.crop_box, state.container);
        assert_eq!(state.transform, CropTransform::new(2.0, 50.0, 0.0));

        for filter in [FilterType::Nearest, FilterType::Bilinear, FilterType::Lanczos3] {
            let result = rasterize(&image, &state, filter).unwrap();
            let decoded = image::load_from_memory(&result.encoded_image)
                .unwrap()
                .into_rgba8();
            assert_eq!(decoded.get_pixel(50, 50).0, [255, 0, 0, 255], "{:?}", filter);
        }
    }

    #[test]
    fn test_default_filter_keeps_zoomed_edge_in_place() {
        let mut store = CropStateStore::new(EngineConfig::default());
        let mut state = square_state(&mut store);
        state.transform = CropTransform::new(1.5, 0.0, 0.0);
        let image = striped_image(4, 4);

        let columns = |filter: FilterType| {
            let result = rasterize(&image, &state, filter).unwrap();
            let decoded = image::load_from_memory(&result.encoded_image)
                .unwrap()
                .into_rgba8();
            (0..100)
                .map(|x| {
                    let p = decoded.get_pixel(x, 50).0;
                    p[0] > p[2]
                })
                .collect::<Vec<_>>()
        };

        let exact = columns(FilterType::Nearest);
        assert_eq!(exact.iter().filter(|red| **red).count(), 50);
        assert_eq!(columns(FilterType::default()), exact);
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let mut store = CropStateStore::new(EngineConfig::default());
        let state = square_state(&mut store);
        let image = striped_image(64, 48);

        let a = rasterize(&image, &state, FilterType::Lanczos3).unwrap();
        let b = rasterize(&image, &state, FilterType::Lanczos3).unwrap();
        assert_eq!(a, b);
    }
}
