//! Validation-layer diagnostics
//!
//! The runtime reports messages through a callback running on a thread it
//! controls. This module turns each message into a `log` event tagged with
//! its severity and decides the verdict handed back to the runtime. Where
//! the events end up is the installed logger's business.

use ash::vk;
use serde::{Deserialize, Serialize};

use crate::foundation::logging::VULKAN_TARGET;

/// Message severity, least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Diagnostic chatter from the loader and layers
    Verbose,
    /// Informational, e.g. resource details
    Info,
    /// Likely application bug or non-optimal usage
    Warning,
    /// Invalid usage
    Error,
}

impl Severity {
    /// Classify a single severity bit reported by the runtime
    ///
    /// Unknown bits are treated as the most severe level they reach.
    pub fn from_flags(flags: vk::DebugUtilsMessageSeverityFlagsEXT) -> Self {
        if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
            Self::Error
        } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
            Self::Warning
        } else if flags.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
            Self::Info
        } else {
            Self::Verbose
        }
    }

    /// The runtime bit for this level
    pub fn flag(self) -> vk::DebugUtilsMessageSeverityFlagsEXT {
        match self {
            Self::Verbose => vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE,
            Self::Info => vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
            Self::Warning => vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
            Self::Error => vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        }
    }

    /// Mask selecting this level and everything more severe
    pub fn at_least(self) -> vk::DebugUtilsMessageSeverityFlagsEXT {
        [Self::Verbose, Self::Info, Self::Warning, Self::Error]
            .into_iter()
            .filter(|level| *level >= self)
            .fold(vk::DebugUtilsMessageSeverityFlagsEXT::empty(), |mask, level| {
                mask | level.flag()
            })
    }

    fn log_level(self) -> log::Level {
        match self {
            Self::Verbose => log::Level::Debug,
            Self::Info => log::Level::Info,
            Self::Warning => log::Level::Warn,
            Self::Error => log::Level::Error,
        }
    }
}

/// Verdict returned to the runtime from the callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackVerdict {
    /// Let the triggering call proceed (`VK_FALSE`)
    Continue,
    /// Mark the message as handled and abort the triggering call (`VK_TRUE`)
    Suppress,
}

impl CallbackVerdict {
    /// Encode for the runtime
    pub fn as_bool32(self) -> vk::Bool32 {
        match self {
            Self::Continue => vk::FALSE,
            Self::Suppress => vk::TRUE,
        }
    }
}

/// When the callback answers with [`CallbackVerdict::Suppress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuppressionPolicy {
    /// Always continue
    Never,
    /// Suppress error-severity messages, continue otherwise
    OnError,
}

impl SuppressionPolicy {
    /// Verdict for a message of the given severity
    pub fn verdict(self, severity: Severity) -> CallbackVerdict {
        match self {
            Self::OnError if severity >= Severity::Error => CallbackVerdict::Suppress,
            _ => CallbackVerdict::Continue,
        }
    }
}

/// Everything needed to register the diagnostics callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsDescriptor {
    /// Severities the runtime should deliver
    pub severities: vk::DebugUtilsMessageSeverityFlagsEXT,
    /// Message categories the runtime should deliver
    pub message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    /// Verdict policy applied by the callback
    pub policy: SuppressionPolicy,
}

impl DiagnosticsDescriptor {
    /// Deliver every category at `min_severity` and above
    pub fn new(min_severity: Severity, policy: SuppressionPolicy) -> Self {
        Self {
            severities: min_severity.at_least(),
            message_types: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            policy,
        }
    }
}

impl Default for DiagnosticsDescriptor {
    fn default() -> Self {
        Self::new(Severity::Verbose, SuppressionPolicy::OnError)
    }
}

/// One message received from the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsEvent {
    /// Severity of the message
    pub severity: Severity,
    /// Categories the message belongs to
    pub message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    /// Message text
    pub message: String,
    /// Debug names of the objects involved, when set
    pub objects: Vec<String>,
}

/// Emit `event` through the logger and compute the verdict
///
/// Never panics on its own; the runtime-facing callback additionally guards
/// against a panicking logger.
pub fn report(event: &DiagnosticsEvent, policy: SuppressionPolicy) -> CallbackVerdict {
    let level = event.severity.log_level();
    if event.objects.is_empty() {
        log::log!(
            target: VULKAN_TARGET,
            level,
            "[{:?}] {}",
            event.message_types,
            event.message
        );
    } else {
        log::log!(
            target: VULKAN_TARGET,
            level,
            "[{:?}] {} (objects: {})",
            event.message_types,
            event.message,
            event.objects.join(", ")
        );
    }

    policy.verdict(event.severity)
}
