//! Submission parameters and their validation.
//!
//! Validation happens synchronously at submission, before any
//! asynchronous work starts; a job id is never handed out for a
//! request that fails here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::CutPolicy;

/// Accepted input container extensions (lowercase, with dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".mp4", ".mov", ".avi", ".mkv", ".webm", ".flv", ".ts", ".m4v",
];

/// Default Mode B silence threshold in seconds.
pub const DEFAULT_THRESHOLD_SECS: f64 = 2.0;
/// Default silence retained before speech resumes, in seconds.
pub const DEFAULT_PRE_BUFFER_SECS: f64 = 0.2;
/// Default silence retained after speech ends, in seconds.
pub const DEFAULT_POST_BUFFER_SECS: f64 = 0.3;
/// Upper bound for a sane Mode B threshold.
const MAX_THRESHOLD_SECS: f64 = 600.0;

/// Check whether a path carries an allow-listed container extension.
pub fn is_supported_container(path: impl AsRef<Path>) -> bool {
    let ext = match path.as_ref().extension().and_then(|e| e.to_str()) {
        Some(e) => format!(".{}", e.to_ascii_lowercase()),
        None => return false,
    };
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// Parameter validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("vad_level must be between 0 and 3, got {0}")]
    InvalidVadLevel(u8),

    #[error("threshold must be greater than 0 and at most {MAX_THRESHOLD_SECS} seconds, got {0}")]
    InvalidThreshold(f64),

    #[error("{name} must be a non-negative number of seconds, got {value}")]
    InvalidBuffer { name: &'static str, value: f64 },

    #[error("{field} is not applicable to mode {mode}")]
    IncompatibleField { mode: CutMode, field: &'static str },
}

/// The three cutting modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutMode {
    /// Remove all silence (with buffers).
    A,
    /// Remove only silences longer than a threshold (with buffers).
    B,
    /// Fixed three-tier pacing rule.
    C,
}

impl std::str::FromStr for CutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(CutMode::A),
            "B" => Ok(CutMode::B),
            "C" => Ok(CutMode::C),
            other => Err(format!("unknown mode '{other}', expected A, B or C")),
        }
    }
}

impl std::fmt::Display for CutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CutMode::A => write!(f, "A"),
            CutMode::B => write!(f, "B"),
            CutMode::C => write!(f, "C"),
        }
    }
}

/// Raw submission parameters as received from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitParams {
    pub mode: CutMode,
    /// Mode B silence threshold in seconds.
    pub threshold: Option<f64>,
    /// Seconds of silence retained before the next speech (Modes A/B).
    pub pre_buffer: Option<f64>,
    /// Seconds of silence retained after the previous speech (Modes A/B).
    pub post_buffer: Option<f64>,
    /// VAD aggressiveness, 0 (least) to 3 (most aggressive).
    pub vad_level: u8,
}

impl SubmitParams {
    /// Parameters for a mode with all optional fields defaulted.
    pub fn for_mode(mode: CutMode) -> Self {
        Self {
            mode,
            threshold: None,
            pre_buffer: None,
            post_buffer: None,
            vad_level: 2,
        }
    }

    /// Validate against mode-specific constraints and build the policy.
    pub fn validate(&self) -> Result<CutPolicy, ParamsError> {
        if self.vad_level > 3 {
            return Err(ParamsError::InvalidVadLevel(self.vad_level));
        }

        match self.mode {
            CutMode::A => {
                if self.threshold.is_some() {
                    return Err(ParamsError::IncompatibleField {
                        mode: self.mode,
                        field: "threshold",
                    });
                }
                Ok(CutPolicy::RemoveAll {
                    pre_buffer: self.checked_buffer("pre_buffer", self.pre_buffer, DEFAULT_PRE_BUFFER_SECS)?,
                    post_buffer: self.checked_buffer("post_buffer", self.post_buffer, DEFAULT_POST_BUFFER_SECS)?,
                })
            }
            CutMode::B => {
                let threshold = self.threshold.unwrap_or(DEFAULT_THRESHOLD_SECS);
                if !threshold.is_finite() || threshold <= 0.0 || threshold > MAX_THRESHOLD_SECS {
                    return Err(ParamsError::InvalidThreshold(threshold));
                }
                Ok(CutPolicy::RemoveLong {
                    threshold,
                    pre_buffer: self.checked_buffer("pre_buffer", self.pre_buffer, DEFAULT_PRE_BUFFER_SECS)?,
                    post_buffer: self.checked_buffer("post_buffer", self.post_buffer, DEFAULT_POST_BUFFER_SECS)?,
                })
            }
            CutMode::C => {
                for (field, value) in [
                    ("threshold", self.threshold),
                    ("pre_buffer", self.pre_buffer),
                    ("post_buffer", self.post_buffer),
                ] {
                    if value.is_some() {
                        return Err(ParamsError::IncompatibleField {
                            mode: self.mode,
                            field,
                        });
                    }
                }
                Ok(CutPolicy::Tempo)
            }
        }
    }

    fn checked_buffer(
        &self,
        name: &'static str,
        value: Option<f64>,
        default: f64,
    ) -> Result<f64, ParamsError> {
        let value = value.unwrap_or(default);
        if !value.is_finite() || value < 0.0 {
            return Err(ParamsError::InvalidBuffer { name, value });
        }
        Ok(value)
    }
}
