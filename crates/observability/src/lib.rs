//! Tracing/logging setup shared by storefront binaries and test harnesses.

/// Initialize process-wide tracing using `STOREFRONT_LOG_FORMAT` and `RUST_LOG`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;
