//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Target used for every event emitted by the Vulkan diagnostics callback
pub const VULKAN_TARGET: &str = "vulkan";

/// Initialize the logging system
///
/// `default_level` applies when `RUST_LOG` is unset. Calling this twice is
/// harmless; the second logger is ignored.
pub fn init(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
