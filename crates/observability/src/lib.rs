//! Log subscriber setup shared by the catalog binaries.

pub mod tracing;

pub use self::tracing::{LogFormat, init_with};

/// Install the global subscriber, picking the format from `LOG_FORMAT`.
///
/// Repeated calls leave the first subscriber in place.
pub fn init() {
    self::tracing::init();
}
