//! Process-wide tracing/logging setup shared by every service binary.

pub mod tracing;

/// Initialize observability for the process.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init(service: &str) {
    tracing::init(service);
}
