//! Scripted in-memory runtime for tests
//!
//! Records every creation and destruction in a shared journal so tests can
//! check teardown order, and keeps the last requests it received.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ash::vk::{self, Handle};

use crate::vulkan::diagnostics::DiagnosticsDescriptor;
use crate::vulkan::runtime::{
    DeviceProperties, DeviceRequest, ExtensionInfo, HostRuntime, InstanceRequest, LayerInfo,
    PhysicalDeviceRef, RegistrationFn, RuntimeDevice, RuntimeInstance, RuntimeResult,
};

/// Lifecycle events observed by the fake runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Journal {
    InstanceCreated,
    InstanceDestroyed,
    MessengerRegistered,
    MessengerDestroyed,
    DeviceCreated,
    DeviceDestroyed,
}

#[derive(Default)]
struct Shared {
    journal: Vec<Journal>,
    instance_request: Option<InstanceRequest>,
    device_request: Option<DeviceRequest>,
}

type SharedState = Rc<RefCell<Shared>>;

fn record(shared: &SharedState, event: Journal) {
    shared.borrow_mut().journal.push(event);
}

#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    enumeration: bool,
    instance: bool,
    registration_missing: bool,
    registration: bool,
    device_enumeration: bool,
    device: bool,
    null_queue: bool,
}

/// Physical device with geometry shaders and families `[transfer, graphics+transfer]`
pub(crate) fn device(
    name: &str,
    device_type: vk::PhysicalDeviceType,
    max_image_dimension: u32,
) -> PhysicalDeviceRef {
    static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

    PhysicalDeviceRef {
        handle: vk::PhysicalDevice::from_raw(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)),
        properties: DeviceProperties {
            name: name.to_string(),
            device_type,
            limits: vk::PhysicalDeviceLimits {
                max_image_dimension2_d: max_image_dimension,
                ..Default::default()
            },
            ..Default::default()
        },
        features: vk::PhysicalDeviceFeatures {
            geometry_shader: vk::TRUE,
            ..Default::default()
        },
        queue_families: vec![
            vk::QueueFamilyProperties {
                queue_flags: vk::QueueFlags::TRANSFER,
                queue_count: 2,
                ..Default::default()
            },
            vk::QueueFamilyProperties {
                queue_flags: vk::QueueFlags::GRAPHICS | vk::QueueFlags::TRANSFER,
                queue_count: 1,
                ..Default::default()
            },
        ],
    }
}

/// Fake host runtime
pub(crate) struct FakeRuntime {
    layers: Vec<LayerInfo>,
    extensions: Vec<ExtensionInfo>,
    devices: Vec<PhysicalDeviceRef>,
    faults: Faults,
    shared: SharedState,
}

impl FakeRuntime {
    pub(crate) fn new() -> Self {
        Self {
            layers: Vec::new(),
            extensions: Vec::new(),
            devices: Vec::new(),
            faults: Faults::default(),
            shared: SharedState::default(),
        }
    }

    pub(crate) fn with_layers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = names.into_iter().map(LayerInfo::named).collect();
        self
    }

    pub(crate) fn with_extensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = names.into_iter().map(ExtensionInfo::named).collect();
        self
    }

    pub(crate) fn with_devices(mut self, devices: Vec<PhysicalDeviceRef>) -> Self {
        self.devices = devices;
        self
    }

    pub(crate) fn failing_enumeration(mut self) -> Self {
        self.faults.enumeration = true;
        self
    }

    pub(crate) fn rejecting_instance(mut self) -> Self {
        self.faults.instance = true;
        self
    }

    pub(crate) fn without_registration_entry_point(mut self) -> Self {
        self.faults.registration_missing = true;
        self
    }

    pub(crate) fn rejecting_registration(mut self) -> Self {
        self.faults.registration = true;
        self
    }

    pub(crate) fn failing_device_enumeration(mut self) -> Self {
        self.faults.device_enumeration = true;
        self
    }

    pub(crate) fn rejecting_device(mut self) -> Self {
        self.faults.device = true;
        self
    }

    pub(crate) fn with_null_queues(mut self) -> Self {
        self.faults.null_queue = true;
        self
    }

    pub(crate) fn journal(&self) -> Vec<Journal> {
        self.shared.borrow().journal.clone()
    }

    pub(crate) fn last_instance_request(&self) -> Option<InstanceRequest> {
        self.shared.borrow().instance_request.clone()
    }

    pub(crate) fn last_device_request(&self) -> Option<DeviceRequest> {
        self.shared.borrow().device_request.clone()
    }

    /// Request with no extensions, layers or diagnostics
    pub(crate) fn instance_request(&self) -> InstanceRequest {
        InstanceRequest {
            application_name: "test".to_string(),
            application_version: 0,
            engine_name: "test".to_string(),
            engine_version: 0,
            api_version: vk::API_VERSION_1_0,
            extensions: Vec::new(),
            layers: Vec::new(),
            diagnostics: None,
        }
    }
}

impl HostRuntime for FakeRuntime {
    type Instance = FakeInstance;

    fn available_layers(&self) -> RuntimeResult<Vec<LayerInfo>> {
        if self.faults.enumeration {
            return Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        }
        Ok(self.layers.clone())
    }

    fn available_extensions(&self) -> RuntimeResult<Vec<ExtensionInfo>> {
        if self.faults.enumeration {
            return Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        }
        Ok(self.extensions.clone())
    }

    fn create_instance(&self, request: &InstanceRequest) -> RuntimeResult<FakeInstance> {
        self.shared.borrow_mut().instance_request = Some(request.clone());
        if self.faults.instance {
            return Err(vk::Result::ERROR_INCOMPATIBLE_DRIVER);
        }

        record(&self.shared, Journal::InstanceCreated);
        Ok(FakeInstance {
            devices: self.devices.clone(),
            faults: self.faults,
            shared: Rc::clone(&self.shared),
        })
    }
}

/// Instance handed out by [`FakeRuntime`]
pub(crate) struct FakeInstance {
    devices: Vec<PhysicalDeviceRef>,
    faults: Faults,
    shared: SharedState,
}

impl Drop for FakeInstance {
    fn drop(&mut self) {
        record(&self.shared, Journal::InstanceDestroyed);
    }
}

impl RuntimeInstance for FakeInstance {
    type Device = FakeDevice;
    type Messenger = FakeMessenger;

    fn find_diagnostics_registration(&self) -> Option<RegistrationFn<'_, FakeMessenger>> {
        if self.faults.registration_missing {
            return None;
        }

        Some(Box::new(move |_descriptor: &DiagnosticsDescriptor| {
            if self.faults.registration {
                return Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT);
            }
            record(&self.shared, Journal::MessengerRegistered);
            Ok(FakeMessenger {
                shared: Rc::clone(&self.shared),
            })
        }))
    }

    fn enumerate_physical_devices(&self) -> RuntimeResult<Vec<PhysicalDeviceRef>> {
        if self.faults.device_enumeration {
            return Err(vk::Result::ERROR_INITIALIZATION_FAILED);
        }
        Ok(self.devices.clone())
    }

    fn create_device(
        &self,
        _physical_device: &PhysicalDeviceRef,
        request: &DeviceRequest,
    ) -> RuntimeResult<FakeDevice> {
        self.shared.borrow_mut().device_request = Some(request.clone());
        if self.faults.device {
            return Err(vk::Result::ERROR_FEATURE_NOT_PRESENT);
        }

        record(&self.shared, Journal::DeviceCreated);
        Ok(FakeDevice {
            null_queue: self.faults.null_queue,
            shared: Rc::clone(&self.shared),
        })
    }
}

/// Messenger handed out by [`FakeInstance`]
pub(crate) struct FakeMessenger {
    shared: SharedState,
}

impl Drop for FakeMessenger {
    fn drop(&mut self) {
        record(&self.shared, Journal::MessengerDestroyed);
    }
}

/// Logical device handed out by [`FakeInstance`]
pub(crate) struct FakeDevice {
    null_queue: bool,
    shared: SharedState,
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        record(&self.shared, Journal::DeviceDestroyed);
    }
}

impl RuntimeDevice for FakeDevice {
    fn queue(&self, family: u32, index: u32) -> vk::Queue {
        if self.null_queue {
            return vk::Queue::null();
        }
        vk::Queue::from_raw(0x1000 + u64::from(family) * 16 + u64::from(index))
    }
}
