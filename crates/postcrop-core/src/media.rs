//! Media capability check.
//!
//! Only still images go through the crop engine; videos and animated images
//! are published unmodified.

use serde::{Deserialize, Serialize};

/// Kind of media attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaType {
    /// Still image (JPEG, PNG, WebP, ...).
    Image,
    /// Animated image (GIF).
    AnimatedImage,
    /// Video of any container format.
    Video,
}

impl MediaType {
    /// Classify a MIME type such as `image/png` or `video/mp4`.
    ///
    /// Returns `None` for anything that is neither an image nor a video.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "image/gif" {
            Some(MediaType::AnimatedImage)
        } else if essence.starts_with("image/") {
            Some(MediaType::Image)
        } else if essence.starts_with("video/") {
            Some(MediaType::Video)
        } else {
            None
        }
    }
}

/// Check whether media of this type can be cropped per platform.
pub fn supports_crop(media_type: MediaType) -> bool {
    matches!(media_type, MediaType::Image)
}
