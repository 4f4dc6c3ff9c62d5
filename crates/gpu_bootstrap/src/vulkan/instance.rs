//! Instance creation
//!
//! Negotiates layers and extensions against the [`CapabilityCatalog`],
//! creates the runtime instance and, when diagnostics are requested,
//! registers the diagnostics callback right after creation.

use ash::vk;

use crate::core::config::{DiagnosticsConfig, InstanceConfig};
use crate::vulkan::catalog::CapabilityCatalog;
use crate::vulkan::diagnostics::DiagnosticsDescriptor;
use crate::vulkan::error::{InitError, InitResult};
use crate::vulkan::extensions::{extensions_satisfied, missing_extensions, required_extensions};
use crate::vulkan::layers::{first_missing_layer, layers_supported};
use crate::vulkan::runtime::{HostRuntime, InstanceRequest, RuntimeInstance};

fn pack_version((major, minor, patch): (u32, u32, u32)) -> u32 {
    vk::make_api_version(0, major, minor, patch)
}

/// A live instance together with its diagnostics registration
///
/// The registration is released before the instance.
pub struct Instance<I: RuntimeInstance> {
    messenger: Option<I::Messenger>,
    raw: I,
    extensions: Vec<String>,
    layers: Vec<String>,
}

impl<I: RuntimeInstance> Instance<I> {
    /// Negotiate capabilities and create the instance
    ///
    /// Nothing is created when negotiation fails. When registration fails
    /// the freshly created instance is destroyed before returning.
    pub fn create<R>(
        runtime: &R,
        config: &InstanceConfig,
        diagnostics: &DiagnosticsConfig,
        platform_extensions: &[String],
    ) -> InitResult<Self>
    where
        R: HostRuntime<Instance = I>,
    {
        let catalog = CapabilityCatalog::load(runtime)?;
        let request = build_request(&catalog, config, diagnostics, platform_extensions)?;

        let raw = runtime
            .create_instance(&request)
            .map_err(InitError::CreationFailed)?;
        log::info!("Created Vulkan instance for '{}'", request.application_name);

        let messenger = match &request.diagnostics {
            Some(descriptor) => Some(register_diagnostics(&raw, descriptor)?),
            None => None,
        };

        Ok(Self {
            messenger,
            raw,
            extensions: request.extensions,
            layers: request.layers,
        })
    }

    /// Underlying runtime instance
    pub fn raw(&self) -> &I {
        &self.raw
    }

    /// Whether the diagnostics callback is registered
    pub fn has_diagnostics(&self) -> bool {
        self.messenger.is_some()
    }

    /// Extensions enabled on the instance
    pub fn enabled_extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Layers enabled on the instance
    pub fn enabled_layers(&self) -> &[String] {
        &self.layers
    }
}

impl<I: RuntimeInstance> Drop for Instance<I> {
    fn drop(&mut self) {
        if self.messenger.take().is_some() {
            log::debug!("cleanup: diagnostics messenger");
        }
        log::debug!("cleanup: instance");
    }
}

/// Validate the catalog against the configuration and build the request
fn build_request(
    catalog: &CapabilityCatalog,
    config: &InstanceConfig,
    diagnostics: &DiagnosticsConfig,
    platform_extensions: &[String],
) -> InitResult<InstanceRequest> {
    let diagnostics_requested = diagnostics.is_requested();

    let available_layers = catalog.layer_names();
    if diagnostics_requested && !layers_supported(&diagnostics.layers, &available_layers) {
        let layer = first_missing_layer(&diagnostics.layers, &available_layers).unwrap_or_default();
        return Err(InitError::UnsupportedDiagnostics {
            layer: layer.to_string(),
        });
    }

    let extensions = required_extensions(platform_extensions, diagnostics_requested);
    let supported = catalog.extension_names();
    if !extensions_satisfied(&extensions, &supported) {
        let missing = missing_extensions(&extensions, &supported)
            .into_iter()
            .map(str::to_string)
            .collect();
        return Err(InitError::UnsupportedExtensions { missing });
    }

    Ok(InstanceRequest {
        application_name: config.application_name.clone(),
        application_version: pack_version(config.application_version),
        engine_name: config.engine_name.clone(),
        engine_version: pack_version(config.engine_version),
        api_version: pack_version(config.api_version),
        extensions,
        layers: diagnostics.requested_layers().to_vec(),
        diagnostics: diagnostics_requested
            .then(|| DiagnosticsDescriptor::new(diagnostics.min_severity, diagnostics.suppression)),
    })
}

fn register_diagnostics<I: RuntimeInstance>(
    instance: &I,
    descriptor: &DiagnosticsDescriptor,
) -> InitResult<I::Messenger> {
    let register = instance
        .find_diagnostics_registration()
        .ok_or(InitError::DiagnosticsRegistrationUnavailable)?;
    let messenger = register(descriptor).map_err(InitError::DiagnosticsRegistrationFailed)?;
    log::debug!("Registered diagnostics messenger");
    Ok(messenger)
}
