//! Queue family resolution

use ash::vk;

use crate::vulkan::runtime::PhysicalDeviceRef;

/// Queue family chosen for each required capability
///
/// Produced by [`QueueFamilyIndices::resolve`]; never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    graphics: Option<u32>,
}

impl QueueFamilyIndices {
    /// Resolve the families of `device`
    pub fn resolve(device: &PhysicalDeviceRef) -> Self {
        Self::from_families(&device.queue_families)
    }

    /// Resolve from a queue family list in native order
    ///
    /// The first family advertising graphics support wins.
    pub fn from_families(families: &[vk::QueueFamilyProperties]) -> Self {
        let graphics = families
            .iter()
            .position(|family| family.queue_flags.contains(vk::QueueFlags::GRAPHICS))
            .and_then(|index| u32::try_from(index).ok());

        Self { graphics }
    }

    /// Graphics family index, if one was found
    pub fn graphics(&self) -> Option<u32> {
        self.graphics
    }

    /// Whether every required capability has a family
    pub fn is_complete(&self) -> bool {
        self.graphics.is_some()
    }
}
