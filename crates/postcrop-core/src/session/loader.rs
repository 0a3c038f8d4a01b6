//! Image sources and the loader collaborator that fetches URLs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::decode::DecodeError;

/// The single image being cropped.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Remote image, fetched through an [`ImageLoader`].
    Url(String),
    /// Encoded image bytes already in memory.
    Blob(Arc<[u8]>),
}

impl ImageSource {
    pub fn blob(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Blob(bytes.into())
    }
}

/// Fetches the encoded bytes behind a URL source.
///
/// Futures are not `Send`: the crop session lives on the UI thread.
#[async_trait(?Send)]
pub trait ImageLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError>;
}

/// Loader backed by an in-memory map of URL to bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, Arc<[u8]>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.entries.insert(url.into(), bytes.into());
    }
}

#[async_trait(?Send)]
impl ImageLoader for MemoryLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError> {
        self.entries
            .get(url)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| DecodeError::Io(format!("not found: {url}")))
    }
}
