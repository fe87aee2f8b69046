use crate::{AppError, AppResult};

use std::{panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Where recording sessions land on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for session folders. Defaults to
    /// `<platform data dir>/captures` when unset.
    #[serde(default)]
    pub output_root: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the configured or platform-default output root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when no platform data directory can be
    /// determined and no explicit root is configured.
    #[track_caller]
    pub fn output_root(&self) -> AppResult<PathBuf> {
        if let Some(root) = &self.output_root {
            return Ok(root.clone());
        }

        let proj_dirs =
            ProjectDirs::from("com", "kinrec", "KinRec").ok_or_else(|| AppError::ConfigError {
                reason: "Failed to get data directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(proj_dirs.data_dir().join("captures"))
    }
}
