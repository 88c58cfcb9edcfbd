//! Global shaping switch
//!
//! Shaping is **enabled by default** whenever a shaping backend is compiled
//! in. Set `RICHTEXT_SHAPING=0` (or `off`, `false`, `no`) to force native
//! measurement everywhere, or flip it at runtime:
//!
//! ```
//! use richtext_shape::config;
//!
//! config::set_shaping_enabled(false);
//! assert!(!config::is_shaping_enabled());
//! config::set_shaping_enabled(true);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

pub const SHAPING_ENV: &str = "RICHTEXT_SHAPING";

static SHAPING_ENABLED: AtomicBool = AtomicBool::new(true);

static ENV_CHECKED: OnceLock<()> = OnceLock::new();

fn check_env() {
    ENV_CHECKED.get_or_init(|| {
        if let Ok(val) = std::env::var(SHAPING_ENV) {
            let disabled = matches!(val.to_lowercase().as_str(), "0" | "off" | "false" | "no");
            if disabled {
                SHAPING_ENABLED.store(false, Ordering::SeqCst);
                log::info!("Richtext shaping disabled via {SHAPING_ENV} env var");
            }
        }
    });
}

/// Whether a real shaper should be used when one is compiled in
///
/// Reads `RICHTEXT_SHAPING` on the first call only.
pub fn is_shaping_enabled() -> bool {
    check_env();
    SHAPING_ENABLED.load(Ordering::SeqCst)
}

/// Override the environment setting
pub fn set_shaping_enabled(enabled: bool) {
    check_env();
    SHAPING_ENABLED.store(enabled, Ordering::SeqCst);
    log::debug!(
        "Richtext shaping {} via runtime call",
        if enabled { "enabled" } else { "disabled" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        set_shaping_enabled(false);
        assert!(!is_shaping_enabled());

        set_shaping_enabled(true);
        assert!(is_shaping_enabled());
    }
}
