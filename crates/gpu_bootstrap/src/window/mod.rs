//! Window management
//!
//! The device pipeline only needs two things from the windowing layer: the
//! instance extensions the platform requires, and a signal telling the
//! event loop to stop. [`PlatformWindow`] captures that seam;
//! [`GlfwWindow`] is the GLFW implementation.

mod glfw_window;

pub use glfw_window::GlfwWindow;

use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The window could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// GLFW cannot report the Vulkan instance extensions it needs
    #[error("Vulkan is not supported by the windowing system")]
    VulkanUnsupported,
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Operations the application needs from a platform window
pub trait PlatformWindow {
    /// Whether the user or the application asked the window to close
    fn should_close(&self) -> bool;

    /// Process pending window system events
    fn poll_events(&mut self);

    /// Instance extensions required to present to this window
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>>;
}

/// Poll events until the window asks to close
///
/// Returns the number of polls performed.
pub fn run_event_loop<W: PlatformWindow + ?Sized>(window: &mut W) -> u64 {
    log::info!("Main loop running...");
    let mut polls = 0u64;
    while !window.should_close() {
        window.poll_events();
        polls += 1;
    }
    log::info!("Main loop finished after {} polls", polls);
    polls
}
