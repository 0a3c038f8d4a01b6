//! Session-level error type.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::platform::PlatformId;

/// Errors raised by the crop state store and the crop session.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CropError {
    /// The source image could not be fetched or decoded.
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] DecodeError),

    /// No image is attached, or it has not been decoded yet.
    #[error("No image loaded")]
    NoImage,

    /// The platform has no crop state; it was never selected.
    #[error("No crop state for platform {0}")]
    InvalidState(PlatformId),

    /// The platform geometry table has no entry for the platform.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(PlatformId),

    /// The rasterized image could not be encoded.
    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),

    /// The image or crop state changed while the result was being produced.
    #[error("Result is out of date")]
    Superseded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decode_error() {
        let err: CropError = DecodeError::InvalidFormat.into();
        assert_eq!(err, CropError::ImageLoad(DecodeError::InvalidFormat));
        assert_eq!(
            err.to_string(),
            "Failed to load image: Invalid or unsupported image format"
        );
    }

    #[test]
    fn test_display_names_platform() {
        let err = CropError::InvalidState("tiktok".into());
        assert_eq!(err.to_string(), "No crop state for platform tiktok");
    }
}
