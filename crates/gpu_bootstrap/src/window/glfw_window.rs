//! GLFW window backend

use glfw::{Action, Key, WindowEvent};

use super::{PlatformWindow, WindowError, WindowResult};
use crate::core::config::WindowConfig;

/// GLFW window wrapper with proper resource management
///
/// Fields drop in declaration order: the window is destroyed before GLFW
/// terminates.
pub struct GlfwWindow {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    glfw: glfw::Glfw,
}

impl GlfwWindow {
    /// Initialize GLFW and open a window without a client API
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{:?}", e)))?;

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(
                config.width,
                config.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        log::info!(
            "Created window '{}' ({}x{})",
            config.title,
            config.width,
            config.height
        );

        Ok(Self {
            window,
            events,
            glfw,
        })
    }

    /// Get the framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (
            u32::try_from(width).unwrap_or(0),
            u32::try_from(height).unwrap_or(0),
        )
    }

    fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Key(Key::Escape, _, Action::Press, _) = event {
            log::debug!("Escape pressed, closing window");
            self.window.set_should_close(true);
        }
    }
}

impl PlatformWindow for GlfwWindow {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn poll_events(&mut self) {
        self.glfw.poll_events();
        let events: Vec<WindowEvent> = glfw::flush_messages(&self.events)
            .map(|(_, event)| event)
            .collect();
        for event in &events {
            self.handle_event(event);
        }
    }

    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or(WindowError::VulkanUnsupported)
    }
}

impl Drop for GlfwWindow {
    fn drop(&mut self) {
        log::debug!("cleanup: window");
    }
}
