//! Units of work that may outlive the context they were started in.
//!
//! Each job carries the image generation it was prepared for. The session
//! accepts a finished job only while that generation and the platform's crop
//! geometry are still current.

use std::sync::Arc;

use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::EncodeError;
use crate::geometry::{CropBox, CropTransform, Size};
use crate::platform::PlatformId;
use crate::raster::{rasterize, FilterType, RasterResult};
use crate::state::PlatformCropState;

use super::loader::{ImageLoader, ImageSource};

/// Request to decode the attached image.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub(super) generation: u64,
    pub(super) source: ImageSource,
}

impl ImageRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Fetch (for URL sources) and decode the image.
    pub async fn decode(self, loader: &dyn ImageLoader) -> LoadedImage {
        let result = match &self.source {
            ImageSource::Blob(bytes) => decode_image(bytes),
            ImageSource::Url(url) => match loader.fetch(url).await {
                Ok(bytes) => decode_image(&bytes),
                Err(err) => Err(err),
            },
        };
        LoadedImage::new(self.generation, result)
    }

    /// Decode bytes the caller already fetched for this request.
    pub fn decode_with(self, bytes: &[u8]) -> LoadedImage {
        LoadedImage::new(self.generation, decode_image(bytes))
    }
}

/// Outcome of an [`ImageRequest`].
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub(super) generation: u64,
    pub(super) result: Result<Arc<DecodedImage>, DecodeError>,
}

impl LoadedImage {
    fn new(generation: u64, result: Result<DecodedImage, DecodeError>) -> Self {
        Self {
            generation,
            result: result.map(Arc::new),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The inputs a raster depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct RasterKey {
    container: Size,
    transform: CropTransform,
    crop_box: CropBox,
}

impl RasterKey {
    pub(super) fn of(state: &PlatformCropState) -> Self {
        Self {
            container: state.container,
            transform: state.transform,
            crop_box: state.crop_box,
        }
    }
}

/// Snapshot of everything needed to rasterize one platform.
#[derive(Debug, Clone)]
pub struct CropJob {
    pub(super) generation: u64,
    pub(super) state: PlatformCropState,
    pub(super) image: Arc<DecodedImage>,
    pub(super) filter: FilterType,
}

impl CropJob {
    pub fn platform(&self) -> &PlatformId {
        &self.state.platform
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Draw and encode. Touches no session state.
    pub fn execute(self) -> JobOutput {
        let result = rasterize(&self.image, &self.state, self.filter);
        JobOutput {
            generation: self.generation,
            key: RasterKey::of(&self.state),
            platform: self.state.platform,
            result,
        }
    }
}

/// Result of [`CropJob::execute`], to hand back to the session.
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub(super) generation: u64,
    pub(super) platform: PlatformId,
    pub(super) key: RasterKey,
    pub(super) result: Result<RasterResult, EncodeError>,
}

impl JobOutput {
    pub fn platform(&self) -> &PlatformId {
        &self.platform
    }
}
