use crate::config::{default_downsample_factor, default_session_name};

use serde::{Deserialize, Serialize};

/// Where the color-frame disk write runs.
///
/// Color frames arrive fastest and carry the largest payload; writing them
/// inline blocks the color callback for the duration of each disk write.
/// Depth and skeleton writes always stay on their callback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorWriteMode {
    /// Fire-and-forget onto the runtime's blocking pool (the default).
    Background,
    /// Write inside the color callback, like the other streams.
    Inline,
}

/// Recording policy and default stream selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Color arrivals per persisted color frame.
    #[serde(default = "default_downsample_factor")]
    pub downsample_factor: u32,
    /// Session name used when the start command gives none.
    #[serde(default = "default_session_name")]
    pub default_session_name: String,
    /// Color persistence policy.
    #[serde(default = "default_color_write")]
    pub color_write: ColorWriteMode,
    /// Record color frames by default.
    #[serde(default = "default_true")]
    pub record_color: bool,
    /// Record depth frames by default.
    #[serde(default = "default_true")]
    pub record_depth: bool,
    /// Record skeleton frames by default.
    #[serde(default = "default_true")]
    pub record_skeleton: bool,
    /// Append hand states to skeleton records by default.
    #[serde(default)]
    pub hand_detail: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            downsample_factor: default_downsample_factor(),
            default_session_name: default_session_name(),
            color_write: default_color_write(),
            record_color: true,
            record_depth: true,
            record_skeleton: true,
            hand_detail: false,
        }
    }
}

fn default_color_write() -> ColorWriteMode {
    ColorWriteMode::Background
}

fn default_true() -> bool {
    true
}
