pub mod game;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Log a message every 100 frames when the `perf_stats` feature is enabled.
///
/// Takes anything exposing the frame number as `.0` (typically
/// `Res<FrameCount>`). Without `perf_stats` this expands to an empty block and
/// the arguments are never evaluated.
///
/// # Example
/// ```ignore
/// profile_log!(frame, "Re-marked {} blockers", moved);
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($frame:expr, $($arg:tt)*) => {
        if $frame.0 % 100 == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($frame:expr, $($arg:tt)*) => {};
}
