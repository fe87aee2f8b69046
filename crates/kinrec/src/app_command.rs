use uuid::Uuid;

/// Streams the user can toggle for the next recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Downsampled raw color frames.
    Color,
    /// Quantized depth frames.
    Depth,
    /// Per-joint skeleton records.
    Skeleton,
    /// The hand-state line appended to skeleton records.
    HandDetail,
}

/// Commands sent from the console control to the main application.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Start a new recording session with the current stream selection.
    StartRecording {
        /// Unique session ID for log correlation.
        session_id: Uuid,
        /// Session name; the configured default is used when `None`.
        name: Option<String>,
        /// Stop automatically after this many seconds.
        duration_secs: Option<u32>,
    },
    /// Stop the current recording session.
    StopRecording,
    /// Toggle one stream for the next session.
    SetStream {
        /// Which stream to toggle.
        stream: StreamKind,
        /// New enable state.
        enabled: bool,
    },
    /// Request application shutdown.
    Shutdown,
}
