//! Job service configuration.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// How long finished outputs stay downloadable, in seconds.
pub const DEFAULT_RETENTION_SECS: u64 = 3_600;

/// Progress value after silence segmentation.
pub const PROGRESS_SEGMENTED: u8 = 10;
/// Progress value after the keep sequence is computed.
pub const PROGRESS_PLANNED: u8 = 12;
/// Progress value when the last segment has been extracted.
pub const PROGRESS_EXTRACTED: u8 = 95;
/// Progress value while the concat pass runs.
pub const PROGRESS_CONCAT: u8 = 99;

/// Configuration for the job manager.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Per-job scratch directories are created under this root.
    pub work_dir: PathBuf,
    /// Finished outputs are written here.
    pub output_dir: PathBuf,
    /// Output retention window after completion.
    pub retention: Duration,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("data/work"),
            output_dir: PathBuf::from("data/output"),
            retention: Duration::from_secs(DEFAULT_RETENTION_SECS),
        }
    }
}

impl JobConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// - `AUTOCUT_WORK_DIR`
    /// - `AUTOCUT_OUTPUT_DIR`
    /// - `AUTOCUT_RETENTION_SECS`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let retention = match std::env::var("AUTOCUT_RETENTION_SECS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!("Invalid AUTOCUT_RETENTION_SECS '{raw}', using default");
                    defaults.retention
                }
            },
            Err(_) => defaults.retention,
        };

        Self {
            work_dir: std::env::var("AUTOCUT_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("AUTOCUT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            retention,
        }
    }
}
