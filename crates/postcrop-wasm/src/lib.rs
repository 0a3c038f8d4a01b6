//! Postcrop WASM - WebAssembly bindings for Postcrop
//!
//! This crate exposes the postcrop-core crop engine to the JavaScript editor
//! that renders the per-platform previews.
//!
//! # Module Structure
//!
//! - `session` - Crop session with pointer controllers (`JsCropSession`)
//! - `geometry` - Stateless crop geometry helpers
//! - `types` - WASM-compatible wrapper types for raster results
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession } from '@postcrop/wasm';
//!
//! await init();
//!
//! const session = new JsCropSession();
//! session.select_platforms(['instagram', 'twitter']);
//! session.attach_image(new Uint8Array(await file.arrayBuffer()));
//! const result = session.crop_all();
//! ```

use wasm_bindgen::prelude::*;

mod geometry;
mod session;
mod types;

// Re-export public types
pub use geometry::{
    box_to_transform, source_rect, supports_crop_mime, transform_css, JsCropTransform, JsSourceRect,
};
pub use session::JsCropSession;
pub use types::JsRasterResult;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    // A second init (hot reload) keeps the existing logger
    if console_log::init_with_level(log::Level::Trace).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }

    log::debug!("postcrop wasm {} ready", version());
}

/// Set the console log level: `error`, `warn`, `info`, `debug` or `trace`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {level}")))?;
    log::set_max_level(filter);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn parse_level(level: &str) -> Option<log::LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "off" => Some(log::LevelFilter::Off),
        "error" => Some(log::LevelFilter::Error),
        "warn" => Some(log::LevelFilter::Warn),
        "info" => Some(log::LevelFilter::Info),
        "debug" => Some(log::LevelFilter::Debug),
        "trace" => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("WARN"), Some(log::LevelFilter::Warn));
        assert_eq!(parse_level("debug"), Some(log::LevelFilter::Debug));
        assert_eq!(parse_level("verbose"), None);
    }
}
