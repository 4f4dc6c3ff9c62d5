//! Device initialization errors

use ash::vk;
use thiserror::Error;

/// Failures surfaced by the device-initialization pipeline
///
/// Every variant is fatal: nothing retries, and the step that detects the
/// failure returns it straight to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// The Vulkan loader library could not be loaded
    #[error("Failed to load Vulkan: {0}")]
    Loading(String),

    /// Querying layers, extensions or devices failed
    #[error("Capability enumeration failed: {0:?}")]
    Enumeration(vk::Result),

    /// Diagnostics were requested but a layer is missing
    #[error("Diagnostics requested but layer {layer} is not available")]
    UnsupportedDiagnostics {
        /// First requested layer absent from the catalog
        layer: String,
    },

    /// Required instance extensions are missing
    #[error("Required instance extensions not supported: {missing:?}")]
    UnsupportedExtensions {
        /// Required names absent from the catalog
        missing: Vec<String>,
    },

    /// The runtime rejected instance creation
    #[error("Instance creation failed: {0:?}")]
    CreationFailed(vk::Result),

    /// The diagnostics registration entry point could not be located
    #[error("Diagnostics registration entry point is unavailable")]
    DiagnosticsRegistrationUnavailable,

    /// Registering the diagnostics callback failed
    #[error("Diagnostics registration failed: {0:?}")]
    DiagnosticsRegistrationFailed(vk::Result),

    /// The instance exposes no physical devices
    #[error("No Vulkan physical devices found")]
    NoDevicesFound,

    /// Every physical device was disqualified
    #[error("No suitable GPU found")]
    NoSuitableDevice,

    /// Logical device requested without a resolved graphics family
    #[error("Queue family indices are incomplete")]
    IncompleteQueueFamilies,

    /// The runtime rejected logical device creation
    #[error("Logical device creation failed: {0:?}")]
    DeviceCreationFailed(vk::Result),

    /// The runtime handed back a null queue
    #[error("Queue retrieval failed for family {family}, slot {index}")]
    QueueRetrievalFailed {
        /// Queue family index
        family: u32,
        /// Queue slot within the family
        index: u32,
    },
}

/// Result type for device initialization
pub type InitResult<T> = Result<T, InitError>;
