//! Vulkan loader backend
//!
//! Implements the runtime traits on top of `ash`. Every owned wrapper
//! destroys its Vulkan object on drop; the pipeline guarantees children are
//! dropped before their parents.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};

use ash::extensions::ext::DebugUtils;
use ash::{vk, Device, Entry, Instance};

use crate::vulkan::diagnostics::{
    report, CallbackVerdict, DiagnosticsDescriptor, DiagnosticsEvent, Severity, SuppressionPolicy,
};
use crate::vulkan::error::{InitError, InitResult};
use crate::vulkan::runtime::{
    DeviceProperties, DeviceRequest, ExtensionInfo, HostRuntime, InstanceRequest, LayerInfo,
    PhysicalDeviceRef, RegistrationFn, RuntimeDevice, RuntimeInstance, RuntimeResult,
};

const CREATE_MESSENGER_ENTRY_POINT: &[u8] = b"vkCreateDebugUtilsMessengerEXT\0";

/// Convert a fixed-size, NUL-terminated Vulkan name array
fn name_from_chars(chars: &[c_char]) -> String {
    if !chars.contains(&0) {
        return String::new();
    }
    // SAFETY: the slice holds a NUL terminator, checked above
    unsafe { CStr::from_ptr(chars.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

fn to_cstrings(names: &[String]) -> RuntimeResult<Vec<CString>> {
    names
        .iter()
        .map(|name| {
            CString::new(name.as_str()).map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)
        })
        .collect()
}

fn pointers(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}

fn messenger_create_info(descriptor: &DiagnosticsDescriptor) -> vk::DebugUtilsMessengerCreateInfoEXT {
    let callback: vk::PFN_vkDebugUtilsMessengerCallbackEXT = match descriptor.policy {
        SuppressionPolicy::Never => Some(continue_callback),
        SuppressionPolicy::OnError => Some(suppress_errors_callback),
    };

    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(descriptor.severities)
        .message_type(descriptor.message_types)
        .pfn_user_callback(callback)
        .build()
}

/// Copy the runtime's callback data into an owned event
///
/// # Safety
/// `data` must be null or point to valid callback data for the duration of
/// the call.
unsafe fn event_from_raw(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
) -> DiagnosticsEvent {
    let mut event = DiagnosticsEvent {
        severity: Severity::from_flags(severity),
        message_types,
        message: String::new(),
        objects: Vec::new(),
    };

    let Some(data) = data.as_ref() else {
        return event;
    };

    if !data.p_message.is_null() {
        event.message = CStr::from_ptr(data.p_message).to_string_lossy().into_owned();
    }

    if !data.p_objects.is_null() && data.object_count > 0 {
        let objects = std::slice::from_raw_parts(data.p_objects, data.object_count as usize);
        event.objects = objects
            .iter()
            .filter(|object| !object.p_object_name.is_null())
            .map(|object| {
                CStr::from_ptr(object.p_object_name)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
    }

    event
}

/// Shared body of the callbacks; never unwinds into the runtime
unsafe fn dispatch(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    policy: SuppressionPolicy,
) -> vk::Bool32 {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let event = event_from_raw(severity, message_types, data);
        report(&event, policy)
    }))
    .unwrap_or(CallbackVerdict::Continue)
    .as_bool32()
}

unsafe extern "system" fn continue_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    dispatch(severity, message_types, data, SuppressionPolicy::Never)
}

unsafe extern "system" fn suppress_errors_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    dispatch(severity, message_types, data, SuppressionPolicy::OnError)
}

/// Loaded Vulkan entry points
pub struct AshRuntime {
    entry: Entry,
}

impl AshRuntime {
    /// Load the system Vulkan loader
    pub fn load() -> InitResult<Self> {
        // SAFETY: loading the loader library runs its initializers; nothing
        // else in the process touches it concurrently during startup
        let entry = unsafe { Entry::load() }
            .map_err(|e| InitError::Loading(format!("{}", e)))?;
        Ok(Self { entry })
    }
}

impl HostRuntime for AshRuntime {
    type Instance = AshInstance;

    #[allow(unused_unsafe)]
    fn available_layers(&self) -> RuntimeResult<Vec<LayerInfo>> {
        let properties = unsafe { self.entry.enumerate_instance_layer_properties()? };
        Ok(properties
            .iter()
            .map(|layer| LayerInfo {
                name: name_from_chars(&layer.layer_name),
                spec_version: layer.spec_version,
                implementation_version: layer.implementation_version,
                description: name_from_chars(&layer.description),
            })
            .collect())
    }

    #[allow(unused_unsafe)]
    fn available_extensions(&self) -> RuntimeResult<Vec<ExtensionInfo>> {
        let properties = unsafe { self.entry.enumerate_instance_extension_properties(None)? };
        Ok(properties
            .iter()
            .map(|extension| ExtensionInfo {
                name: name_from_chars(&extension.extension_name),
                spec_version: extension.spec_version,
            })
            .collect())
    }

    fn create_instance(&self, request: &InstanceRequest) -> RuntimeResult<AshInstance> {
        let app_name = CString::new(request.application_name.as_str())
            .map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)?;
        let engine_name = CString::new(request.engine_name.as_str())
            .map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)?;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(request.application_version)
            .engine_name(&engine_name)
            .engine_version(request.engine_version)
            .api_version(request.api_version);

        let extensions = to_cstrings(&request.extensions)?;
        let extension_ptrs = pointers(&extensions);
        let layers = to_cstrings(&request.layers)?;
        let layer_ptrs = pointers(&layers);

        // Chained so messages emitted during vkCreateInstance are delivered
        let mut debug_info = request.diagnostics.as_ref().map(messenger_create_info);

        let mut create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);
        if let Some(debug_info) = debug_info.as_mut() {
            create_info = create_info.push_next(debug_info);
        }

        let instance = unsafe { self.entry.create_instance(&create_info, None)? };

        Ok(AshInstance {
            entry: self.entry.clone(),
            instance,
        })
    }
}

/// Vulkan instance wrapper with RAII cleanup
pub struct AshInstance {
    entry: Entry,
    instance: Instance,
}

impl AshInstance {
    /// Raw `ash` instance
    pub fn handle(&self) -> &Instance {
        &self.instance
    }

    fn describe(&self, handle: vk::PhysicalDevice) -> PhysicalDeviceRef {
        let (properties, features, queue_families) = unsafe {
            (
                self.instance.get_physical_device_properties(handle),
                self.instance.get_physical_device_features(handle),
                self.instance.get_physical_device_queue_family_properties(handle),
            )
        };

        PhysicalDeviceRef {
            handle,
            properties: DeviceProperties {
                name: name_from_chars(&properties.device_name),
                device_type: properties.device_type,
                api_version: properties.api_version,
                driver_version: properties.driver_version,
                vendor_id: properties.vendor_id,
                device_id: properties.device_id,
                limits: properties.limits,
            },
            features,
            queue_families,
        }
    }
}

impl Drop for AshInstance {
    fn drop(&mut self) {
        unsafe {
            self.instance.destroy_instance(None);
        }
    }
}

impl RuntimeInstance for AshInstance {
    type Device = AshDevice;
    type Messenger = AshMessenger;

    fn find_diagnostics_registration(&self) -> Option<RegistrationFn<'_, AshMessenger>> {
        let name = CStr::from_bytes_with_nul(CREATE_MESSENGER_ENTRY_POINT).ok()?;
        let entry_point = unsafe {
            self.entry
                .get_instance_proc_addr(self.instance.handle(), name.as_ptr())
        };
        if entry_point.is_none() {
            log::warn!("{} not exposed by the instance", name.to_string_lossy());
            return None;
        }

        Some(Box::new(move |descriptor: &DiagnosticsDescriptor| {
            let loader = DebugUtils::new(&self.entry, &self.instance);
            let create_info = messenger_create_info(descriptor);
            let handle = unsafe { loader.create_debug_utils_messenger(&create_info, None)? };
            Ok(AshMessenger { loader, handle })
        }))
    }

    fn enumerate_physical_devices(&self) -> RuntimeResult<Vec<PhysicalDeviceRef>> {
        let handles = unsafe { self.instance.enumerate_physical_devices()? };
        Ok(handles
            .into_iter()
            .map(|handle| self.describe(handle))
            .collect())
    }

    fn create_device(
        &self,
        physical_device: &PhysicalDeviceRef,
        request: &DeviceRequest,
    ) -> RuntimeResult<AshDevice> {
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> = request
            .queues
            .iter()
            .map(|queue| {
                vk::DeviceQueueCreateInfo::builder()
                    .queue_family_index(queue.family_index)
                    .queue_priorities(&queue.priorities)
                    .build()
            })
            .collect();

        let layers = to_cstrings(&request.layers)?;
        let layer_ptrs = pointers(&layers);

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_layer_names(&layer_ptrs)
            .enabled_features(&request.features);

        let device = unsafe {
            self.instance
                .create_device(physical_device.handle, &create_info, None)?
        };

        Ok(AshDevice { device })
    }
}

/// Registered debug messenger; unregistered on drop
pub struct AshMessenger {
    loader: DebugUtils,
    handle: vk::DebugUtilsMessengerEXT,
}

impl Drop for AshMessenger {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_debug_utils_messenger(self.handle, None);
        }
    }
}

/// Logical device wrapper with RAII cleanup
pub struct AshDevice {
    device: Device,
}

impl AshDevice {
    /// Raw `ash` device
    pub fn handle(&self) -> &Device {
        &self.device
    }
}

impl RuntimeDevice for AshDevice {
    fn queue(&self, family: u32, index: u32) -> vk::Queue {
        unsafe { self.device.get_device_queue(family, index) }
    }
}

impl Drop for AshDevice {
    fn drop(&mut self) {
        unsafe {
            // Ensure device is idle before destruction
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn chars(text: &str, len: usize) -> Vec<c_char> {
        let mut out = vec![0 as c_char; len];
        for (slot, byte) in out.iter_mut().zip(text.bytes()) {
            *slot = byte as c_char;
        }
        out
    }

    #[test]
    fn test_name_from_chars() {
        assert_eq!(name_from_chars(&chars("VK_KHR_surface", 256)), "VK_KHR_surface");
        assert_eq!(name_from_chars(&chars("", 4)), "");
    }

    #[test]
    fn test_name_without_terminator_is_empty() {
        let unterminated = vec![b'A' as c_char; 4];
        assert_eq!(name_from_chars(&unterminated), "");
    }

    #[test]
    fn test_interior_nul_rejected() {
        let names = vec!["VK_LAYER\0bad".to_string()];
        assert_eq!(
            to_cstrings(&names).unwrap_err(),
            vk::Result::ERROR_INITIALIZATION_FAILED
        );
    }

    #[test]
    fn test_create_info_carries_descriptor() {
        let descriptor = DiagnosticsDescriptor::new(Severity::Warning, SuppressionPolicy::Never);
        let info = messenger_create_info(&descriptor);
        assert_eq!(info.message_severity, Severity::Warning.at_least());
        assert_eq!(info.message_type, descriptor.message_types);
        assert!(info.pfn_user_callback.is_some());
        assert!(info.p_user_data.is_null());
    }

    #[test]
    fn test_callbacks_follow_policy() {
        let message = CString::new("vkQueueSubmit: fence already in use").unwrap();
        let object_name = CString::new("frame fence").unwrap();
        let objects = [vk::DebugUtilsObjectNameInfoEXT::builder()
            .object_type(vk::ObjectType::FENCE)
            .object_name(&object_name)
            .build()];
        let data = vk::DebugUtilsMessengerCallbackDataEXT::builder()
            .message(&message)
            .objects(&objects)
            .build();

        let error = vk::DebugUtilsMessageSeverityFlagsEXT::ERROR;
        let warning = vk::DebugUtilsMessageSeverityFlagsEXT::WARNING;
        let kind = vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION;

        unsafe {
            assert_eq!(suppress_errors_callback(error, kind, &data, ptr::null_mut()), vk::TRUE);
            assert_eq!(suppress_errors_callback(warning, kind, &data, ptr::null_mut()), vk::FALSE);
            assert_eq!(continue_callback(error, kind, &data, ptr::null_mut()), vk::FALSE);
        }
    }

    #[test]
    fn test_event_from_raw_copies_message_and_objects() {
        let message = CString::new("Validation Error").unwrap();
        let named = CString::new("swapchain image").unwrap();
        let objects = [
            vk::DebugUtilsObjectNameInfoEXT::builder()
                .object_type(vk::ObjectType::IMAGE)
                .object_name(&named)
                .build(),
            vk::DebugUtilsObjectNameInfoEXT::builder()
                .object_type(vk::ObjectType::DEVICE)
                .build(),
        ];
        let data = vk::DebugUtilsMessengerCallbackDataEXT::builder()
            .message(&message)
            .objects(&objects)
            .build();

        let event = unsafe {
            event_from_raw(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
                vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
                &data,
            )
        };
        assert_eq!(event.severity, Severity::Warning);
        assert_eq!(event.message, "Validation Error");
        assert_eq!(event.objects, vec!["swapchain image".to_string()]);
    }

    #[test]
    fn test_event_from_null_data() {
        let event = unsafe {
            event_from_raw(
                vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                ptr::null(),
            )
        };
        assert_eq!(event.severity, Severity::Info);
        assert!(event.message.is_empty());
        assert!(event.objects.is_empty());
    }
}
