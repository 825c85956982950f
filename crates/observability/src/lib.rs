//! Tracing/logging setup shared by the binary and the test suites.

pub mod tracing;

/// Initialize process-wide JSON logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Human-readable logging captured by the test harness.
pub fn init_for_tests() {
    tracing::init_for_tests();
}
