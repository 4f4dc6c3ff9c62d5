//! Vulkan context management
//!
//! [`DeviceContext`] runs the whole bring-up: instance and diagnostics,
//! physical device selection, queue family resolution and logical device
//! creation. It owns every handle it creates.

use ash::vk;

use crate::core::config::BootstrapConfig;
use crate::vulkan::device_selector::select_physical_device;
use crate::vulkan::error::{InitError, InitResult};
use crate::vulkan::instance::Instance;
use crate::vulkan::logical_device::LogicalDevice;
use crate::vulkan::queue_family::QueueFamilyIndices;
use crate::vulkan::runtime::{HostRuntime, PhysicalDeviceRef, RuntimeInstance};

/// Main Vulkan context that owns all core Vulkan resources
///
/// Fields drop in declaration order: logical device, then the instance
/// (which releases its diagnostics messenger before itself).
pub struct DeviceContext<I: RuntimeInstance> {
    device: LogicalDevice<I::Device>,
    physical_device: PhysicalDeviceRef,
    queue_families: QueueFamilyIndices,
    instance: Instance<I>,
}

impl<I: RuntimeInstance> DeviceContext<I> {
    /// Bring up a device against `runtime`
    ///
    /// `platform_extensions` are the instance extensions the windowing layer
    /// needs. Any failure destroys what was created so far, newest first.
    pub fn initialize<R>(
        runtime: &R,
        config: &BootstrapConfig,
        platform_extensions: &[String],
    ) -> InitResult<Self>
    where
        R: HostRuntime<Instance = I>,
    {
        let instance = Instance::create(
            runtime,
            &config.instance,
            &config.diagnostics,
            platform_extensions,
        )?;

        let physical_device = select_physical_device(instance.raw())?;

        let queue_families = QueueFamilyIndices::resolve(&physical_device);
        if !queue_families.is_complete() {
            return Err(InitError::IncompleteQueueFamilies);
        }

        let device = LogicalDevice::create(&instance, &physical_device, &queue_families)?;

        Ok(Self {
            device,
            physical_device,
            queue_families,
            instance,
        })
    }

    /// Get the instance
    pub fn instance(&self) -> &Instance<I> {
        &self.instance
    }

    /// Get the selected physical device
    pub fn physical_device(&self) -> &PhysicalDeviceRef {
        &self.physical_device
    }

    /// Get the resolved queue families
    pub fn queue_families(&self) -> &QueueFamilyIndices {
        &self.queue_families
    }

    /// Get the logical device
    pub fn device(&self) -> &LogicalDevice<I::Device> {
        &self.device
    }

    /// Get the graphics queue
    pub fn graphics_queue(&self) -> vk::Queue {
        self.device.graphics_queue()
    }
}
