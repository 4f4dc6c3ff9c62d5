//! Diagnostic layer negotiation

/// First requested layer that `available` does not contain
pub fn first_missing_layer<'a>(requested: &'a [String], available: &[&str]) -> Option<&'a str> {
    requested
        .iter()
        .map(String::as_str)
        .find(|name| !available.iter().any(|layer| layer == name))
}

/// Whether every requested layer is available
///
/// Stops at the first miss and reports it.
pub fn layers_supported(requested: &[String], available: &[&str]) -> bool {
    match first_missing_layer(requested, available) {
        Some(missing) => {
            log::warn!("Requested diagnostic layer not found: {}", missing);
            false
        }
        None => true,
    }
}
