//! Process-wide tracing/logging setup.

/// Tracing subscriber configuration.
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize JSON logging filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init(LogFormat::Json);
}

/// Initialize logging with an explicit output format.
pub fn init_with(format: LogFormat) {
    self::tracing::init(format);
}
