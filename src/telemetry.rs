//! Log subscriber setup for binaries embedding this crate.

/// Installs a `fmt` subscriber logging at `level` and above.
/// Returns `false` if a global subscriber is already set.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing(level: tracing::Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}
