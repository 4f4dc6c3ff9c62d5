//! # GPU Bootstrap
//!
//! Brings up a Vulkan device for rendering: creates the instance with
//! optional validation layers, picks the best physical device, resolves a
//! graphics queue family and opens a logical device with its queue.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gpu_bootstrap::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BootstrapConfig::default();
//!     let mut window = GlfwWindow::new(&config.window)?;
//!     let extensions = window.required_instance_extensions()?;
//!
//!     let runtime = AshRuntime::load()?;
//!     let context = VulkanContext::initialize(&runtime, &config, &extensions)?;
//!     println!("Running on {}", context.physical_device().name());
//!
//!     run_event_loop(&mut window);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod vulkan;
pub mod window;

/// Common imports for bootstrap users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{BootstrapConfig, DiagnosticsConfig, InstanceConfig, WindowConfig},
        vulkan::{AshRuntime, DeviceContext, InitError, VulkanContext},
        window::{run_event_loop, GlfwWindow, PlatformWindow, WindowError},
    };
}
