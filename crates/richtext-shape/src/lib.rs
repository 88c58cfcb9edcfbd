//! Shaping for richtext: deciding what to shape and shaping it
//!
//! Latin text is measured and drawn by the host canvas. Scripts whose
//! glyphs reorder and combine, such as Devanagari, go through a real
//! shaper instead. This crate provides:
//!
//! - [`ComplexScripts`] - Decides which strings need shaping
//! - [`HarfrustShaper`] - harfrust shaping with skrifa outlines (feature `shaping-hr`)
//! - [`NullShaper`] - Always unavailable, so everything falls back to native
//! - [`default_shaper`] - Picks one of the two at startup

use std::sync::Arc;

use richtext_core::Shaper;

pub mod config;
mod null;
pub mod script;

#[cfg(feature = "shaping-hr")]
mod hr;
#[cfg(feature = "shaping-hr")]
pub mod outline;

#[cfg(feature = "shaping-hr")]
pub use hr::{FaceCacheStats, HarfrustShaper};
pub use null::NullShaper;
pub use script::ComplexScripts;

/// The shaper to use when the caller does not bring one
///
/// Harfrust when compiled in and not disabled via `RICHTEXT_SHAPING`,
/// otherwise [`NullShaper`].
pub fn default_shaper() -> Arc<dyn Shaper> {
    #[cfg(feature = "shaping-hr")]
    {
        if config::is_shaping_enabled() {
            return Arc::new(HarfrustShaper::new());
        }
        log::info!("Shaping disabled, complex scripts use native measurement");
    }
    Arc::new(NullShaper::new())
}
