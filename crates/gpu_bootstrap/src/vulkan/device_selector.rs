//! Physical device selection
//!
//! Scoring is a pure function of the device description. Devices lacking
//! geometry shaders or a graphics queue family score zero and can never be
//! picked. Otherwise the score is the largest supported 2D image dimension,
//! plus [`DISCRETE_GPU_BONUS`] for discrete GPUs.
//!
//! Among the candidates the strictly highest score wins; equal scores keep
//! enumeration order, so the first device seen is preferred.

use ash::vk;

use crate::vulkan::error::{InitError, InitResult};
use crate::vulkan::queue_family::QueueFamilyIndices;
use crate::vulkan::runtime::{PhysicalDeviceRef, RuntimeInstance};

/// Bonus added to the score of discrete GPUs
pub const DISCRETE_GPU_BONUS: u32 = 10_000;

/// A candidate device and its score
#[derive(Debug, Clone)]
pub struct ScoredDevice {
    /// The candidate
    pub device: PhysicalDeviceRef,
    /// Suitability, zero when disqualified
    pub score: u32,
}

/// Suitability of `device`, zero when disqualified
pub fn score_device(device: &PhysicalDeviceRef) -> u32 {
    if device.features.geometry_shader != vk::TRUE {
        log::debug!("{}: no geometry shader support", device.name());
        return 0;
    }

    if !QueueFamilyIndices::resolve(device).is_complete() {
        log::debug!("{}: no graphics queue family", device.name());
        return 0;
    }

    let mut score = device.properties.limits.max_image_dimension2_d;
    if device.properties.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score = score.saturating_add(DISCRETE_GPU_BONUS);
    }
    score
}

/// Score every candidate, best first
///
/// The sort is stable, so equal scores stay in enumeration order.
pub fn rank_devices(candidates: Vec<PhysicalDeviceRef>) -> Vec<ScoredDevice> {
    let mut ranked: Vec<ScoredDevice> = candidates
        .into_iter()
        .map(|device| {
            let score = score_device(&device);
            log::debug!(
                "Candidate GPU '{}' ({:?}) scored {}",
                device.name(),
                device.properties.device_type,
                score
            );
            ScoredDevice { device, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Pick the best of `candidates`
pub fn pick_physical_device(candidates: Vec<PhysicalDeviceRef>) -> InitResult<PhysicalDeviceRef> {
    if candidates.is_empty() {
        return Err(InitError::NoDevicesFound);
    }
    log::debug!("Found {} physical devices", candidates.len());

    match rank_devices(candidates).into_iter().next() {
        Some(best) if best.score > 0 => {
            log::info!("Selected GPU: {} (score {})", best.device.name(), best.score);
            Ok(best.device)
        }
        _ => Err(InitError::NoSuitableDevice),
    }
}

/// Enumerate the devices of `instance` and pick the best
pub fn select_physical_device<I: RuntimeInstance>(instance: &I) -> InitResult<PhysicalDeviceRef> {
    let candidates = instance
        .enumerate_physical_devices()
        .map_err(InitError::Enumeration)?;
    pick_physical_device(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulkan::testing::{device, FakeRuntime};
    use crate::vulkan::runtime::HostRuntime;

    #[test]
    fn test_discrete_bonus() {
        let integrated = device("iGPU", vk::PhysicalDeviceType::INTEGRATED_GPU, 4096);
        let discrete = device("dGPU", vk::PhysicalDeviceType::DISCRETE_GPU, 4096);
        assert_eq!(score_device(&integrated), 4096);
        assert_eq!(score_device(&discrete), 14096);
    }

    #[test]
    fn test_pick_prefers_discrete() {
        let integrated = device("D1", vk::PhysicalDeviceType::INTEGRATED_GPU, 4096);
        let discrete = device("D2", vk::PhysicalDeviceType::DISCRETE_GPU, 4096);
        let picked = pick_physical_device(vec![integrated, discrete]).unwrap();
        assert_eq!(picked.name(), "D2");
    }

    #[test]
    fn test_large_integrated_can_beat_discrete() {
        let integrated = device("big", vk::PhysicalDeviceType::INTEGRATED_GPU, 16384);
        let discrete = device("small", vk::PhysicalDeviceType::DISCRETE_GPU, 2048);
        assert_eq!(pick_physical_device(vec![discrete, integrated]).unwrap().name(), "big");
    }

    #[test]
    fn test_missing_geometry_shader_disqualifies() {
        let mut gpu = device("no-geom", vk::PhysicalDeviceType::DISCRETE_GPU, 16384);
        gpu.features.geometry_shader = vk::FALSE;
        assert_eq!(score_device(&gpu), 0);
    }

    #[test]
    fn test_missing_graphics_family_disqualifies() {
        let mut gpu = device("compute-only", vk::PhysicalDeviceType::DISCRETE_GPU, 16384);
        for family in &mut gpu.queue_families {
            family.queue_flags = vk::QueueFlags::COMPUTE;
        }
        assert_eq!(score_device(&gpu), 0);
    }

    #[test]
    fn test_positive_score_requires_both_checks() {
        let gpu = device("cpu", vk::PhysicalDeviceType::CPU, 1);
        assert!(score_device(&gpu) > 0);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let first = device("first", vk::PhysicalDeviceType::DISCRETE_GPU, 8192);
        let second = device("second", vk::PhysicalDeviceType::DISCRETE_GPU, 8192);
        assert_eq!(pick_physical_device(vec![first, second]).unwrap().name(), "first");
    }

    #[test]
    fn test_rank_orders_best_first() {
        let ranked = rank_devices(vec![
            device("a", vk::PhysicalDeviceType::INTEGRATED_GPU, 1024),
            device("b", vk::PhysicalDeviceType::DISCRETE_GPU, 1024),
            device("c", vk::PhysicalDeviceType::VIRTUAL_GPU, 2048),
        ]);
        let names: Vec<&str> = ranked.iter().map(|s| s.device.name()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_empty_enumeration() {
        assert_eq!(pick_physical_device(Vec::new()).unwrap_err(), InitError::NoDevicesFound);
    }

    #[test]
    fn test_all_zero_scores() {
        let mut gpu = device("no-geom", vk::PhysicalDeviceType::DISCRETE_GPU, 16384);
        gpu.features.geometry_shader = vk::FALSE;
        assert_eq!(
            pick_physical_device(vec![gpu]).unwrap_err(),
            InitError::NoSuitableDevice
        );
    }

    #[test]
    fn test_select_enumerates_instance_devices() {
        let runtime = FakeRuntime::new().with_devices(vec![
            device("D1", vk::PhysicalDeviceType::INTEGRATED_GPU, 4096),
            device("D2", vk::PhysicalDeviceType::DISCRETE_GPU, 4096),
        ]);
        let instance = runtime.create_instance(&runtime.instance_request()).unwrap();
        assert_eq!(select_physical_device(&instance).unwrap().name(), "D2");
    }
}
