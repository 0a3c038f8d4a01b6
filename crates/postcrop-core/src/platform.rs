//! Platform geometry table.
//!
//! Maps a platform identifier to the output size a network expects and a
//! human label. The table is a pure data source; [`display_size`] turns a
//! platform size into the on-screen preview container.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::geometry::Size;

/// Identifier of a publishing platform (e.g. `"instagram"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(String);

impl PlatformId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlatformId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlatformId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Required output geometry of a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub id: PlatformId,
    pub label: String,
    /// Canonical publish width in pixels.
    pub width: u32,
    /// Canonical publish height in pixels.
    pub height: u32,
}

impl PlatformSpec {
    pub fn new(
        id: impl Into<PlatformId>,
        label: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }
}

/// Source of platform dimensions.
pub trait PlatformGeometry {
    /// Look up the output geometry of a platform.
    fn dimensions(&self, platform: &PlatformId) -> Option<PlatformSpec>;
}

/// In-memory platform table seeded with common networks.
#[derive(Debug, Clone)]
pub struct PlatformTable {
    entries: HashMap<PlatformId, PlatformSpec>,
}

impl Default for PlatformTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for spec in [
            PlatformSpec::new("instagram", "Instagram Post", 1080, 1080),
            PlatformSpec::new("instagram_portrait", "Instagram Portrait", 1080, 1350),
            PlatformSpec::new("instagram_story", "Instagram Story", 1080, 1920),
            PlatformSpec::new("facebook", "Facebook Post", 1200, 630),
            PlatformSpec::new("twitter", "X / Twitter", 1600, 900),
            PlatformSpec::new("linkedin", "LinkedIn", 1200, 627),
            PlatformSpec::new("pinterest", "Pinterest Pin", 1000, 1500),
            PlatformSpec::new("tiktok", "TikTok Cover", 1080, 1920),
            PlatformSpec::new("threads", "Threads", 1080, 1350),
            PlatformSpec::new("youtube", "YouTube Thumbnail", 1280, 720),
        ] {
            table.insert(spec);
        }
        table
    }
}

impl PlatformTable {
    /// Create a table with no entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace a platform entry.
    pub fn insert(&mut self, spec: PlatformSpec) {
        self.entries.insert(spec.id.clone(), spec);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ordered by identifier.
    pub fn specs(&self) -> Vec<&PlatformSpec> {
        let mut specs: Vec<_> = self.entries.values().collect();
        specs.sort_by(|a, b| a.id.cmp(&b.id));
        specs
    }
}

impl PlatformGeometry for PlatformTable {
    fn dimensions(&self, platform: &PlatformId) -> Option<PlatformSpec> {
        self.entries.get(platform).cloned()
    }
}

/// Size of the preview container for a platform.
///
/// The platform size is scaled down (never up) to fit within
/// `max_display_width` x `max_display_height` while preserving its aspect
/// ratio.
pub fn display_size(spec: &PlatformSpec, config: &EngineConfig) -> Size {
    let width = spec.width.max(1) as f64;
    let height = spec.height.max(1) as f64;

    let scale = (config.max_display_width / width)
        .min(config.max_display_height / height)
        .min(1.0);

    Size::new(width * scale, height * scale)
}
