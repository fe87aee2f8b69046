use kinrec_core::FrameDescription;
use serde::{Deserialize, Serialize};

/// Stream geometries. Defaults match the sensor's native color and depth
/// resolutions; frames that do not match are discarded by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Color stream width in pixels.
    #[serde(default = "default_color_width")]
    pub color_width: u32,
    /// Color stream height in pixels.
    #[serde(default = "default_color_height")]
    pub color_height: u32,
    /// Depth stream width in pixels.
    #[serde(default = "default_depth_width")]
    pub depth_width: u32,
    /// Depth stream height in pixels.
    #[serde(default = "default_depth_height")]
    pub depth_height: u32,
}

impl SensorConfig {
    /// Color stream geometry.
    pub fn color_description(&self) -> FrameDescription {
        FrameDescription {
            width: self.color_width,
            height: self.color_height,
        }
    }

    /// Depth stream geometry.
    pub fn depth_description(&self) -> FrameDescription {
        FrameDescription {
            width: self.depth_width,
            height: self.depth_height,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            color_width: default_color_width(),
            color_height: default_color_height(),
            depth_width: default_depth_width(),
            depth_height: default_depth_height(),
        }
    }
}

fn default_color_width() -> u32 {
    1920
}

fn default_color_height() -> u32 {
    1080
}

fn default_depth_width() -> u32 {
    512
}

fn default_depth_height() -> u32 {
    424
}
