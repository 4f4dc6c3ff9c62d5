//! Vulkan device initialization
//!
//! Leaf-first: the capability catalog feeds the extension and layer
//! negotiators, which feed instance creation. Device selection scores every
//! physical device, the queue family resolver picks the graphics family,
//! and the logical device factory opens the device and its queue.
//! [`DeviceContext`] chains the steps and owns the results.

pub mod ash_backend;
pub mod catalog;
pub mod context;
pub mod device_selector;
pub mod diagnostics;
pub mod error;
pub mod extensions;
pub mod instance;
pub mod layers;
pub mod logical_device;
pub mod queue_family;
pub mod runtime;

#[cfg(test)]
pub(crate) mod testing;

pub use ash_backend::{AshDevice, AshInstance, AshMessenger, AshRuntime};
pub use catalog::CapabilityCatalog;
pub use context::DeviceContext;
pub use device_selector::{pick_physical_device, score_device, select_physical_device, DISCRETE_GPU_BONUS};
pub use diagnostics::{CallbackVerdict, DiagnosticsDescriptor, DiagnosticsEvent, Severity, SuppressionPolicy};
pub use error::{InitError, InitResult};
pub use instance::Instance;
pub use logical_device::LogicalDevice;
pub use queue_family::QueueFamilyIndices;
pub use runtime::{
    DeviceRequest, HostRuntime, InstanceRequest, PhysicalDeviceRef, QueueRequest, RuntimeDevice,
    RuntimeInstance,
};

/// Device context backed by the system Vulkan loader
pub type VulkanContext = DeviceContext<AshInstance>;
