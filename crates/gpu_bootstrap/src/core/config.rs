//! # Bootstrap Configuration
//!
//! Every knob the device bring-up reads lives here: window geometry, the
//! application info handed to the Vulkan instance, and whether the
//! validation layers are requested.
//!
//! Diagnostics are a runtime decision. `DiagnosticsConfig::enabled` left as
//! `None` resolves to "on" in debug builds and "off" in release builds, but
//! both code paths are always compiled and either can be forced.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::vulkan::diagnostics::{Severity, SuppressionPolicy};

/// Khronos validation layer, the default diagnostics layer
pub const KHRONOS_VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Window created by the host windowing layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text
    pub title: String,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Whether the user may resize the window
    pub resizable: bool,
}

impl WindowConfig {
    /// Create a window configuration
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            resizable: false,
        }
    }

    /// Allow or forbid resizing
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("Vulkan-Hello-Triangle", 800, 600)
    }
}

/// Application metadata passed to instance creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Application name reported to the driver
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Engine name reported to the driver
    pub engine_name: String,
    /// Engine version (major, minor, patch)
    pub engine_version: (u32, u32, u32),
    /// Vulkan API version requested (major, minor, patch)
    pub api_version: (u32, u32, u32),
}

impl InstanceConfig {
    /// Create an instance configuration for the named application
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            application_version: (1, 0, 0),
            engine_name: "No Engine".to_string(),
            engine_version: (1, 0, 0),
            api_version: (1, 0, 0),
        }
    }

    /// Set application version
    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.application_version = (major, minor, patch);
        self
    }

    /// Set requested API version
    pub fn with_api_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.api_version = (major, minor, patch);
        self
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self::new("Hello Triangle")
    }
}

/// Validation layer negotiation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Force diagnostics on or off; `None` follows the build profile
    pub enabled: Option<bool>,
    /// Layers that must be present when diagnostics are requested
    pub layers: Vec<String>,
    /// Least severe message the runtime should deliver
    pub min_severity: Severity,
    /// Verdict returned to the runtime from the callback
    pub suppression: SuppressionPolicy,
}

impl DiagnosticsConfig {
    /// Diagnostics forced off
    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }

    /// Diagnostics forced on with the default layer set
    pub fn enabled() -> Self {
        Self {
            enabled: Some(true),
            ..Self::default()
        }
    }

    /// Replace the requested layer list
    pub fn with_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the callback suppression policy
    pub fn with_suppression(mut self, suppression: SuppressionPolicy) -> Self {
        self.suppression = suppression;
        self
    }

    /// Whether diagnostics are requested for this run
    pub fn is_requested(&self) -> bool {
        self.enabled.unwrap_or(cfg!(debug_assertions))
    }

    /// Layers to enable, empty when diagnostics are not requested
    pub fn requested_layers(&self) -> &[String] {
        if self.is_requested() {
            &self.layers
        } else {
            &[]
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            layers: vec![KHRONOS_VALIDATION_LAYER.to_string()],
            min_severity: Severity::Verbose,
            suppression: SuppressionPolicy::OnError,
        }
    }
}

/// # Complete Bootstrap Configuration
///
/// Top-level configuration read by the application entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Window settings
    pub window: WindowConfig,
    /// Instance application info
    pub instance: InstanceConfig,
    /// Validation layer settings
    pub diagnostics: DiagnosticsConfig,
}

impl BootstrapConfig {
    /// Create a configuration for the named application with defaults elsewhere
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            instance: InstanceConfig::new(app_name),
            ..Self::default()
        }
    }

    /// Replace the window settings
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Replace the diagnostics settings
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if std::path::Path::new(path).exists() {
            log::info!("Loading configuration from {}", path);
            Self::load_from_file(path)
        } else {
            log::debug!("No configuration at {}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance.application_name.is_empty() {
            return Err(ConfigError::Invalid(
                "Application name cannot be empty".to_string(),
            ));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let names = [
            &self.instance.application_name,
            &self.instance.engine_name,
            &self.window.title,
        ];
        if let Some(name) = names
            .into_iter()
            .chain(&self.diagnostics.layers)
            .find(|name| name.contains('\0'))
        {
            return Err(ConfigError::Invalid(format!(
                "Name contains an interior NUL: {:?}",
                name
            )));
        }

        if self.diagnostics.is_requested() && self.diagnostics.layers.is_empty() {
            return Err(ConfigError::Invalid(
                "Diagnostics requested but no layers listed".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            instance: InstanceConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl Config for BootstrapConfig {}
