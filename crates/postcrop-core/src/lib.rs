//! Postcrop Core - Per-platform image crop engine
//!
//! This crate lets one source image be framed independently for every
//! platform a post is published to, and rasterizes for each platform exactly
//! the region its preview shows. It includes the crop geometry, the crop
//! state store, the interactive controllers, and the multi-platform session.

pub mod config;
pub mod controller;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod media;
pub mod platform;
pub mod raster;
pub mod session;
pub mod state;

pub use config::{ConfigError, EngineConfig};
pub use controller::{CropBoxController, Gesture, LivePreview, PanController, ResizeHandle};
pub use error::CropError;
pub use geometry::{CropBox, CropTransform, Size, SourceRect};
pub use media::{supports_crop, MediaType};
pub use platform::{PlatformGeometry, PlatformId, PlatformSpec, PlatformTable};
pub use raster::{FilterType, RasterResult};
pub use session::{BatchOutcome, CropSession, ImageLoader, ImageSource, MemoryLoader};
pub use state::{AccountRef, Axis, CropStateStore, PlatformCropConfig, PlatformCropState};
