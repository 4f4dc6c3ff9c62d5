//! Host runtime abstraction
//!
//! The pipeline talks to the graphics runtime only through the traits in
//! this module. [`crate::vulkan::ash_backend`] implements them on top of the
//! Vulkan loader; tests use a scripted in-memory runtime.
//!
//! Owned handles ([`HostRuntime::Instance`], [`RuntimeInstance::Device`],
//! [`RuntimeInstance::Messenger`]) release the underlying object when
//! dropped. Callers keep the owning values in reverse-creation drop order.

use ash::vk;

use crate::vulkan::diagnostics::DiagnosticsDescriptor;

/// Result of a raw runtime call
pub type RuntimeResult<T> = Result<T, vk::Result>;

/// Callable returned by the diagnostics capability lookup
pub type RegistrationFn<'a, M> = Box<dyn FnOnce(&DiagnosticsDescriptor) -> RuntimeResult<M> + 'a>;

/// An instance layer advertised by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    /// Layer name, e.g. `VK_LAYER_KHRONOS_validation`
    pub name: String,
    /// Vulkan version the layer was written against
    pub spec_version: u32,
    /// Layer build version
    pub implementation_version: u32,
    /// Human readable description
    pub description: String,
}

impl LayerInfo {
    /// Layer with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec_version: 0,
            implementation_version: 0,
            description: String::new(),
        }
    }
}

/// An instance extension advertised by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    /// Extension name, e.g. `VK_KHR_surface`
    pub name: String,
    /// Extension revision
    pub spec_version: u32,
}

impl ExtensionInfo {
    /// Extension with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec_version: 0,
        }
    }
}

/// Physical device properties the pipeline cares about
#[derive(Debug, Clone, Default)]
pub struct DeviceProperties {
    /// Marketing name
    pub name: String,
    /// Discrete, integrated, virtual, CPU or other
    pub device_type: vk::PhysicalDeviceType,
    /// Highest API version supported
    pub api_version: u32,
    /// Vendor specific driver version
    pub driver_version: u32,
    /// PCI vendor id
    pub vendor_id: u32,
    /// Vendor specific device id
    pub device_id: u32,
    /// Implementation limits
    pub limits: vk::PhysicalDeviceLimits,
}

/// Non-owning reference to a physical device and its capabilities
///
/// Only meaningful while the instance that enumerated it is alive.
#[derive(Debug, Clone, Default)]
pub struct PhysicalDeviceRef {
    /// Raw handle
    pub handle: vk::PhysicalDevice,
    /// Queryable properties
    pub properties: DeviceProperties,
    /// Supported optional features
    pub features: vk::PhysicalDeviceFeatures,
    /// Queue families in native order
    pub queue_families: Vec<vk::QueueFamilyProperties>,
}

impl PhysicalDeviceRef {
    /// Device name for logging
    pub fn name(&self) -> &str {
        &self.properties.name
    }
}

/// Parameters for instance creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRequest {
    /// Application name
    pub application_name: String,
    /// Packed application version
    pub application_version: u32,
    /// Engine name
    pub engine_name: String,
    /// Packed engine version
    pub engine_version: u32,
    /// Packed API version
    pub api_version: u32,
    /// Instance extensions to enable
    pub extensions: Vec<String>,
    /// Instance layers to enable
    pub layers: Vec<String>,
    /// Callback descriptor chained into creation so creation-time messages are seen
    pub diagnostics: Option<DiagnosticsDescriptor>,
}

/// One queue-family entry of a device creation request
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRequest {
    /// Queue family index
    pub family_index: u32,
    /// One priority in `[0, 1]` per queue
    pub priorities: Vec<f32>,
}

/// Parameters for logical device creation
#[derive(Debug, Clone)]
pub struct DeviceRequest {
    /// Queues to create
    pub queues: Vec<QueueRequest>,
    /// Device layers, ignored by modern loaders
    pub layers: Vec<String>,
    /// Features to enable
    pub features: vk::PhysicalDeviceFeatures,
}

/// Entry points available before an instance exists
pub trait HostRuntime {
    /// Instance type produced by this runtime
    type Instance: RuntimeInstance;

    /// Enumerate the instance layers the runtime offers
    fn available_layers(&self) -> RuntimeResult<Vec<LayerInfo>>;

    /// Enumerate the instance extensions the runtime offers
    fn available_extensions(&self) -> RuntimeResult<Vec<ExtensionInfo>>;

    /// Create an instance
    fn create_instance(&self, request: &InstanceRequest) -> RuntimeResult<Self::Instance>;
}

/// Entry points of a live instance
pub trait RuntimeInstance {
    /// Logical device type produced by this instance
    type Device: RuntimeDevice;

    /// Registered diagnostics callback; dropping it unregisters the callback
    type Messenger;

    /// Look up the extension entry point that registers the diagnostics callback
    ///
    /// `None` means the runtime does not provide it.
    fn find_diagnostics_registration(&self) -> Option<RegistrationFn<'_, Self::Messenger>>;

    /// Enumerate physical devices in runtime order
    fn enumerate_physical_devices(&self) -> RuntimeResult<Vec<PhysicalDeviceRef>>;

    /// Open a logical device
    fn create_device(
        &self,
        physical_device: &PhysicalDeviceRef,
        request: &DeviceRequest,
    ) -> RuntimeResult<Self::Device>;
}

/// Entry points of a live logical device
pub trait RuntimeDevice {
    /// Fetch the queue at `index` within `family`
    fn queue(&self, family: u32, index: u32) -> vk::Queue;
}
