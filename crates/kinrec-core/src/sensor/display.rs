use crate::{
    pipeline::StatusReport,
    sensor::{FrameDescription, TrackedBody},
};

/// Data-binding seam toward the UI layer.
///
/// The pipeline pushes converted display buffers, extracted bodies, status
/// reports and countdown updates through this trait; how they are rendered
/// (bitmaps, overlay lines, status bar) is the UI's concern. Implementations
/// are called from the frame callback contexts and must not block for long.
pub trait DisplaySink: Send + Sync {
    /// A new BGRA color frame is ready for display.
    fn present_color(&self, description: FrameDescription, pixels: &[u8]);

    /// A new quantized BGRA depth frame is ready for display.
    fn present_depth(&self, description: FrameDescription, pixels: &[u8]);

    /// The tracked bodies extracted from the latest body frame. Empty when
    /// no body is currently tracked.
    fn present_bodies(&self, bodies: &[TrackedBody]);

    /// A throttled frame-rate estimate (at most one per refresh interval).
    fn status(&self, report: StatusReport);

    /// Seconds left on the recording countdown.
    fn countdown(&self, remaining_secs: u32);
}
