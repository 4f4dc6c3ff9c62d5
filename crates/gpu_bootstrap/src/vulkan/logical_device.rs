//! Logical device creation

use ash::vk;

use crate::vulkan::error::{InitError, InitResult};
use crate::vulkan::instance::Instance;
use crate::vulkan::queue_family::QueueFamilyIndices;
use crate::vulkan::runtime::{
    DeviceRequest, PhysicalDeviceRef, QueueRequest, RuntimeDevice, RuntimeInstance,
};

/// Priority given to the single graphics queue
pub const GRAPHICS_QUEUE_PRIORITY: f32 = 1.0;

/// Logical device wrapper with its graphics queue
pub struct LogicalDevice<D> {
    raw: D,
    graphics_queue: vk::Queue,
    graphics_family: u32,
}

impl<D: RuntimeDevice> LogicalDevice<D> {
    /// Open `physical_device` with one graphics queue
    ///
    /// Device layers mirror the instance layers for older loaders; modern
    /// loaders ignore them.
    pub fn create<I>(
        instance: &Instance<I>,
        physical_device: &PhysicalDeviceRef,
        indices: &QueueFamilyIndices,
    ) -> InitResult<Self>
    where
        I: RuntimeInstance<Device = D>,
    {
        let graphics_family = indices.graphics().ok_or(InitError::IncompleteQueueFamilies)?;

        let request = DeviceRequest {
            queues: vec![QueueRequest {
                family_index: graphics_family,
                priorities: vec![GRAPHICS_QUEUE_PRIORITY],
            }],
            layers: instance.enabled_layers().to_vec(),
            features: vk::PhysicalDeviceFeatures::default(),
        };

        let raw = instance
            .raw()
            .create_device(physical_device, &request)
            .map_err(InitError::DeviceCreationFailed)?;
        log::info!(
            "Created logical device on '{}' (graphics family {})",
            physical_device.name(),
            graphics_family
        );

        let graphics_queue = raw.queue(graphics_family, 0);
        if graphics_queue == vk::Queue::null() {
            log::error!("Graphics queue handle is null");
            return Err(InitError::QueueRetrievalFailed {
                family: graphics_family,
                index: 0,
            });
        }

        Ok(Self {
            raw,
            graphics_queue,
            graphics_family,
        })
    }
}

impl<D> LogicalDevice<D> {
    /// Underlying runtime device
    pub fn raw(&self) -> &D {
        &self.raw
    }

    /// Queue for graphics submission
    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// Family the graphics queue belongs to
    pub fn graphics_family(&self) -> u32 {
        self.graphics_family
    }
}
