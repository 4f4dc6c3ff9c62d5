//! Capability catalog
//!
//! Snapshot of the layers and extensions the runtime advertised when the
//! catalog was loaded. Queries are read-only.

use crate::vulkan::error::{InitError, InitResult};
use crate::vulkan::runtime::{ExtensionInfo, HostRuntime, LayerInfo};

/// Layers and extensions offered by the host runtime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityCatalog {
    layers: Vec<LayerInfo>,
    extensions: Vec<ExtensionInfo>,
}

impl CapabilityCatalog {
    /// Build a catalog from explicit lists
    pub fn new(layers: Vec<LayerInfo>, extensions: Vec<ExtensionInfo>) -> Self {
        Self { layers, extensions }
    }

    /// Query the runtime once for both lists
    pub fn load<R: HostRuntime>(runtime: &R) -> InitResult<Self> {
        let layers = runtime.available_layers().map_err(InitError::Enumeration)?;
        let extensions = runtime
            .available_extensions()
            .map_err(InitError::Enumeration)?;

        log::debug!(
            "Runtime offers {} instance layers and {} instance extensions",
            layers.len(),
            extensions.len()
        );

        Ok(Self { layers, extensions })
    }

    /// Available layers in runtime order
    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    /// Available extensions in runtime order
    pub fn extensions(&self) -> &[ExtensionInfo] {
        &self.extensions
    }

    /// Names of the available layers
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name.as_str()).collect()
    }

    /// Names of the available extensions
    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|ext| ext.name.as_str()).collect()
    }

    /// Whether a layer with exactly this name is available
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.name == name)
    }

    /// Whether an extension with exactly this name is available
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| ext.name == name)
    }
}
