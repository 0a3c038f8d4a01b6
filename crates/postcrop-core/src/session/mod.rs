//! Multi-platform crop session.
//!
//! A [`CropSession`] owns the attached image, the crop state store and the
//! raster cache. Work that can outlive its context is split into phases:
//!
//! 1. [`CropSession::image_request`] / [`CropSession::prepare`] snapshot the
//!    current context into a request or job.
//! 2. [`ImageRequest::decode`] / [`CropJob::execute`] run without touching
//!    the session (the decode may await a loader).
//! 3. [`CropSession::install_image`] / [`CropSession::complete`] accept the
//!    outcome only if the image generation and the platform's crop geometry
//!    still match; otherwise the outcome is dropped as
//!    [`CropError::Superseded`].
//!
//! [`CropSession::crop_for_platform`] and [`CropSession::crop_all`] compose
//! the phases for callers that hold the session for the whole operation.

mod job;
mod loader;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::{ConfigError, EngineConfig};
use crate::decode::{DecodeError, DecodedImage};
use crate::error::CropError;
use crate::geometry::Size;
use crate::platform::{PlatformGeometry, PlatformId, PlatformTable};
use crate::raster::RasterResult;
use crate::state::{AccountRef, CropStateStore, PlatformCropConfigs, PlatformCropState};

pub use job::{CropJob, ImageRequest, JobOutput, LoadedImage};
pub use loader::{ImageLoader, ImageSource, MemoryLoader};

use job::RasterKey;

#[derive(Debug, Clone)]
enum ImageSlot {
    Empty,
    Pending(ImageSource),
    Ready(Arc<DecodedImage>),
    Failed(DecodeError),
}

#[derive(Debug, Clone)]
struct CachedRaster {
    key: RasterKey,
    result: Arc<RasterResult>,
}

/// Result of a batch rasterization.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub images: BTreeMap<PlatformId, Arc<RasterResult>>,
    /// Platforms that could not be rasterized, with the reason.
    pub not_ready: BTreeMap<PlatformId, CropError>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.not_ready.is_empty()
    }

    /// Base64 PNG per platform.
    pub fn cropped_images(&self) -> BTreeMap<PlatformId, String> {
        self.images
            .iter()
            .map(|(p, r)| (p.clone(), r.to_base64()))
            .collect()
    }
}

/// Crop editing session for one post draft.
#[derive(Debug)]
pub struct CropSession<G: PlatformGeometry = PlatformTable> {
    geometry: G,
    store: CropStateStore,
    generation: u64,
    image: ImageSlot,
    cache: HashMap<PlatformId, CachedRaster>,
}

impl CropSession<PlatformTable> {
    /// Session over the built-in platform table and default config.
    pub fn with_defaults() -> Self {
        Self {
            geometry: PlatformTable::default(),
            store: CropStateStore::new(EngineConfig::default()),
            generation: 0,
            image: ImageSlot::Empty,
            cache: HashMap::new(),
        }
    }
}

impl<G: PlatformGeometry> CropSession<G> {
    /// Create a session after validating `config`.
    pub fn new(geometry: G, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            geometry,
            store: CropStateStore::new(config),
            generation: 0,
            image: ImageSlot::Empty,
            cache: HashMap::new(),
        })
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutable geometry access; existing states keep their container size.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn store(&self) -> &CropStateStore {
        &self.store
    }

    /// Mutable store access for controllers; cached rasters of edited
    /// platforms go stale automatically.
    pub fn store_mut(&mut self) -> &mut CropStateStore {
        &mut self.store
    }

    /// Current image generation; bumped by every attach.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Attach a new source image.
    ///
    /// All crop states are re-seeded with defaults for the selected
    /// platforms, cached rasters are dropped, and in-flight work for the
    /// previous image will be rejected. Returns the new generation.
    pub fn attach_image(&mut self, source: ImageSource) -> u64 {
        self.generation += 1;
        self.image = ImageSlot::Pending(source);
        self.cache.clear();

        let selected = self.store.selected().to_vec();
        self.store.clear();
        if let Err(err) = self.store.select_platforms(&selected, &self.geometry) {
            log::warn!("could not re-seed platforms for new image: {err}");
        }

        log::info!(
            "attached image generation {} for {} platforms",
            self.generation,
            selected.len()
        );
        self.generation
    }

    /// Drop the image, every crop state and every cached raster.
    pub fn discard(&mut self) {
        self.generation += 1;
        self.image = ImageSlot::Empty;
        self.cache.clear();
        self.store.clear();
    }

    /// Set the platforms the post is published to.
    pub fn select_platforms(&mut self, platforms: &[PlatformId]) -> Result<(), CropError> {
        self.store.select_platforms(platforms, &self.geometry)
    }

    /// State of a platform, initialized with defaults on first access.
    pub fn get_state(&mut self, platform: &PlatformId) -> Result<&PlatformCropState, CropError> {
        self.store.get_state(platform, &self.geometry)
    }

    /// Restore the default crop of a platform.
    pub fn reset_platform(
        &mut self,
        platform: &PlatformId,
    ) -> Result<&PlatformCropState, CropError> {
        self.store.reset(platform)
    }

    /// Flag the account a platform publishes to.
    pub fn set_connected_account(
        &mut self,
        platform: &PlatformId,
        account: Option<AccountRef>,
    ) -> Result<&PlatformCropState, CropError> {
        self.store.set_bound_account(platform, account)
    }

    /// Decoded image size, once loaded.
    pub fn image_size(&self) -> Option<Size> {
        match &self.image {
            ImageSlot::Ready(image) => Some(image.size()),
            _ => None,
        }
    }

    /// Request for decoding the attached image, if it is still pending.
    pub fn image_request(&self) -> Option<ImageRequest> {
        match &self.image {
            ImageSlot::Pending(source) => Some(ImageRequest {
                generation: self.generation,
                source: source.clone(),
            }),
            _ => None,
        }
    }

    /// Accept a decoded image for the current generation.
    ///
    /// A decode failure is recorded and returned; it is not retried until a
    /// new image is attached.
    pub fn install_image(&mut self, loaded: LoadedImage) -> Result<(), CropError> {
        if loaded.generation != self.generation {
            log::warn!(
                "dropping image for generation {} (current {})",
                loaded.generation,
                self.generation
            );
            return Err(CropError::Superseded);
        }

        match loaded.result {
            Ok(image) => {
                log::info!("decoded image {}x{}", image.width, image.height);
                self.image = ImageSlot::Ready(image);
                Ok(())
            }
            Err(err) => {
                log::warn!("image decode failed: {err}");
                self.image = ImageSlot::Failed(err.clone());
                Err(CropError::ImageLoad(err))
            }
        }
    }

    /// Make sure the attached image is decoded, fetching it if needed.
    pub async fn load_image(&mut self, loader: &dyn ImageLoader) -> Result<(), CropError> {
        match &self.image {
            ImageSlot::Ready(_) => Ok(()),
            ImageSlot::Failed(err) => Err(CropError::ImageLoad(err.clone())),
            ImageSlot::Empty => Err(CropError::NoImage),
            ImageSlot::Pending(source) => {
                let request = ImageRequest {
                    generation: self.generation,
                    source: source.clone(),
                };
                let loaded = request.decode(loader).await;
                self.install_image(loaded)
            }
        }
    }

    /// Cached raster of a platform, if its crop geometry is unchanged.
    pub fn cached(&self, platform: &PlatformId) -> Option<Arc<RasterResult>> {
        let state = self.store.state(platform)?;
        self.cache
            .get(platform)
            .filter(|c| c.key == RasterKey::of(state))
            .map(|c| Arc::clone(&c.result))
    }

    /// Snapshot a platform's state for rasterization.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the platform is not selected, `NoImage` or
    /// `ImageLoad` if no decoded image is available.
    pub fn prepare(&self, platform: &PlatformId) -> Result<CropJob, CropError> {
        let state = match self.store.state(platform) {
            Some(state) if self.store.is_selected(platform) => state,
            _ => {
                log::error!("crop requested for unselected platform {platform}");
                return Err(CropError::InvalidState(platform.clone()));
            }
        };

        let image = match &self.image {
            ImageSlot::Ready(image) => Arc::clone(image),
            ImageSlot::Failed(err) => return Err(CropError::ImageLoad(err.clone())),
            ImageSlot::Empty | ImageSlot::Pending(_) => return Err(CropError::NoImage),
        };

        Ok(CropJob {
            generation: self.generation,
            state: state.clone(),
            image,
            filter: self.store.config().filter,
        })
    }

    /// Accept a finished job if its context is still current, and cache it.
    pub fn complete(&mut self, output: JobOutput) -> Result<Arc<RasterResult>, CropError> {
        let current = self
            .store
            .state(&output.platform)
            .filter(|_| self.store.is_selected(&output.platform))
            .map(RasterKey::of);

        if output.generation != self.generation || current != Some(output.key) {
            log::warn!("dropping stale raster for {}", output.platform);
            return Err(CropError::Superseded);
        }

        let result = Arc::new(output.result?);
        self.cache.insert(
            output.platform,
            CachedRaster {
                key: output.key,
                result: Arc::clone(&result),
            },
        );
        Ok(result)
    }

    /// Rasterize a platform with the already decoded image.
    pub fn rasterize(&mut self, platform: &PlatformId) -> Result<Arc<RasterResult>, CropError> {
        if let Some(cached) = self.cached(platform) {
            return Ok(cached);
        }
        let job = self.prepare(platform)?;
        self.complete(job.execute())
    }

    /// Load the image if needed, then rasterize one platform.
    pub async fn crop_for_platform(
        &mut self,
        platform: &PlatformId,
        loader: &dyn ImageLoader,
    ) -> Result<Arc<RasterResult>, CropError> {
        if let Some(cached) = self.cached(platform) {
            return Ok(cached);
        }
        self.load_image(loader).await?;
        self.rasterize(platform)
    }

    /// Rasterize every listed platform with the already decoded image.
    ///
    /// A failing platform is reported in `not_ready` and does not stop the
    /// others.
    pub fn rasterize_all(&mut self, platforms: &[PlatformId]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for platform in platforms {
            match self.rasterize(platform) {
                Ok(result) => {
                    outcome.images.insert(platform.clone(), result);
                }
                Err(err) => {
                    log::warn!("platform {platform} not ready: {err}");
                    outcome.not_ready.insert(platform.clone(), err);
                }
            }
        }

        log::info!(
            "rasterized {} of {} platforms",
            outcome.images.len(),
            platforms.len()
        );
        outcome
    }

    /// Load the image if needed, then rasterize every listed platform.
    pub async fn crop_all(
        &mut self,
        platforms: &[PlatformId],
        loader: &dyn ImageLoader,
    ) -> BatchOutcome {
        if let Err(err) = self.load_image(loader).await {
            log::warn!("batch aborted before rasterizing: {err}");
            let mut outcome = BatchOutcome::default();
            for platform in platforms {
                match self.cached(platform) {
                    Some(result) => {
                        outcome.images.insert(platform.clone(), result);
                    }
                    None => {
                        outcome.not_ready.insert(platform.clone(), err.clone());
                    }
                }
            }
            return outcome;
        }
        self.rasterize_all(platforms)
    }

    /// Crop configs of the selected platforms, for draft persistence.
    pub fn platform_crop_configs(&self) -> PlatformCropConfigs {
        self.store.snapshot()
    }

    /// Base64 PNG of every selected platform with an up-to-date raster.
    pub fn cropped_images(&self) -> BTreeMap<PlatformId, String> {
        self.store
            .selected()
            .iter()
            .filter_map(|p| self.cached(p).map(|r| (p.clone(), r.to_base64())))
            .collect()
    }

    /// Selected platforms without an up-to-date raster.
    pub fn not_ready_platforms(&self) -> Vec<PlatformId> {
        self.store
            .selected()
            .iter()
            .filter(|p| self.cached(p).is_none())
            .cloned()
            .collect()
    }
}
