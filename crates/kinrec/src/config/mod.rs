mod config;
mod recording_config;
mod sensor_config;
mod storage_config;

pub(crate) use {
    config::Config,
    recording_config::{ColorWriteMode, RecordingConfig},
    sensor_config::SensorConfig,
    storage_config::StorageConfig,
};

pub(crate) const DEFAULT_DOWNSAMPLE_FACTOR: u32 = 5;
pub(crate) const DEFAULT_SESSION_NAME: &str = "recording";

pub(crate) fn default_downsample_factor() -> u32 {
    DEFAULT_DOWNSAMPLE_FACTOR
}

pub(crate) fn default_session_name() -> String {
    DEFAULT_SESSION_NAME.to_string()
}
