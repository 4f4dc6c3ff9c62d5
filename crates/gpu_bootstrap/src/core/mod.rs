//! # Core Module
//!
//! Shared configuration types consumed by the windowing layer, the
//! device-initialization pipeline and the application entry point.

pub mod config;

pub use config::{
    BootstrapConfig,
    DiagnosticsConfig,
    InstanceConfig,
    WindowConfig,
    KHRONOS_VALIDATION_LAYER,
};

pub use crate::config::{Config, ConfigError};
