//! Instance extension negotiation

use std::collections::HashSet;

use ash::extensions::ext::DebugUtils;

/// Extension that provides the diagnostics callback
pub fn diagnostics_extension_name() -> String {
    DebugUtils::name().to_string_lossy().into_owned()
}

/// Extensions the instance must enable
///
/// The platform list comes first in its own order; the diagnostics
/// extension is appended when diagnostics are requested.
pub fn required_extensions(platform: &[String], diagnostics_requested: bool) -> Vec<String> {
    let mut required = platform.to_vec();
    if diagnostics_requested {
        required.push(diagnostics_extension_name());
    }
    required
}

/// Required names that are absent from `supported`
pub fn missing_extensions<'a>(required: &'a [String], supported: &[&str]) -> Vec<&'a str> {
    let supported: HashSet<&str> = supported.iter().copied().collect();
    required
        .iter()
        .map(String::as_str)
        .filter(|name| !supported.contains(name))
        .collect()
}

/// Whether every required name appears in `supported`
///
/// Names match exactly and case-sensitively. A catalog with fewer entries
/// than distinct required names fails without a full comparison.
pub fn extensions_satisfied(required: &[String], supported: &[&str]) -> bool {
    log::debug!("Required instance extensions: {:?}", required);
    log::debug!("Supported instance extensions: {:?}", supported);

    let distinct_required: HashSet<&str> = required.iter().map(String::as_str).collect();
    if supported.len() < distinct_required.len() {
        log::debug!(
            "Runtime offers {} extensions, {} required",
            supported.len(),
            distinct_required.len()
        );
        return false;
    }

    let missing = missing_extensions(required, supported);
    for name in &missing {
        log::warn!("Required instance extension not found: {}", name);
    }
    missing.is_empty()
}
