//! Hardware encoder capability detection.
//!
//! Probes the FFmpeg build once, in fixed preference order (NVIDIA,
//! AMD, Intel, then software), and caches the winner for the process
//! lifetime. An absent hardware encoder is a normal negative probe
//! result; only a missing FFmpeg binary is fatal.

use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// A usable video encoder and the output arguments that drive it.
#[derive(Debug, Clone)]
pub struct Encoder {
    name: &'static str,
    label: &'static str,
    args: &'static [&'static str],
    hardware: bool,
}

impl Encoder {
    /// FFmpeg encoder identifier (e.g. `h264_nvenc`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Output arguments to pass to FFmpeg (`-c:v` and quality opts).
    pub fn output_args(&self) -> impl Iterator<Item = &'static str> {
        self.args.iter().copied()
    }

    /// Whether this encoder is hardware-accelerated.
    pub fn is_hardware(&self) -> bool {
        self.hardware
    }
}

/// Hardware candidates, in probe order.
const HARDWARE_CANDIDATES: &[Encoder] = &[
    Encoder {
        name: "h264_nvenc",
        label: "NVIDIA NVENC",
        args: &["-c:v", "h264_nvenc", "-preset", "p4", "-cq", "18"],
        hardware: true,
    },
    Encoder {
        name: "h264_amf",
        label: "AMD AMF",
        args: &[
            "-c:v", "h264_amf", "-quality", "balanced", "-qp_i", "18", "-qp_p", "20",
        ],
        hardware: true,
    },
    Encoder {
        name: "h264_qsv",
        label: "Intel QSV",
        args: &["-c:v", "h264_qsv", "-global_quality", "18"],
        hardware: true,
    },
];

/// Universal software fallback.
pub(crate) const SOFTWARE_ENCODER: Encoder = Encoder {
    name: "libx264",
    label: "software x264",
    args: &["-c:v", "libx264", "-preset", "fast", "-crf", "18"],
    hardware: false,
};

/// Owns the probe result for the process lifetime. Constructed once by
/// the job manager; no global state.
#[derive(Debug, Default)]
pub struct EncoderDetector {
    selected: OnceCell<Encoder>,
}

impl EncoderDetector {
    pub fn new() -> Self {
        Self {
            selected: OnceCell::new(),
        }
    }

    /// Return the selected encoder, probing on first use.
    pub async fn select(&self) -> MediaResult<&Encoder> {
        self.selected.get_or_try_init(probe_encoders).await
    }
}

async fn probe_encoders() -> MediaResult<Encoder> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let listed = match list_encoders().await {
        Ok(text) => text,
        Err(e) => {
            warn!("Encoder listing failed, falling back to software: {e}");
            String::new()
        }
    };

    for candidate in HARDWARE_CANDIDATES {
        // The encoder name appears space-delimited in `ffmpeg -encoders`
        if !listed.contains(&format!(" {} ", candidate.name)) {
            continue;
        }
        if try_dummy_encode(candidate).await {
            info!(
                encoder = candidate.name,
                hardware = true,
                "Selected video encoder: {}",
                candidate.label
            );
            return Ok(candidate.clone());
        }
        debug!(encoder = candidate.name, "Encoder listed but probe encode failed");
    }

    info!(
        encoder = SOFTWARE_ENCODER.name,
        hardware = false,
        "Selected video encoder: {} (no usable hardware encoder)",
        SOFTWARE_ENCODER.label
    );
    Ok(SOFTWARE_ENCODER)
}

/// List the encoders compiled into the FFmpeg build.
async fn list_encoders() -> MediaResult<String> {
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await?;

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Confirm an encoder actually works with a tiny synthetic encode.
/// NVENC requires at least 145x145 frames, hence 320x240.
async fn try_dummy_encode(encoder: &Encoder) -> bool {
    let mut cmd = Command::new("ffmpeg");
    cmd.args([
        "-hide_banner",
        "-f",
        "lavfi",
        "-i",
        "testsrc=size=320x240:rate=25:duration=0.1",
        "-vf",
        "format=yuv420p",
    ])
    .args(encoder.args.iter())
    .args(["-f", "null", "-"])
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null());

    matches!(cmd.status().await, Ok(status) if status.success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let names: Vec<_> = HARDWARE_CANDIDATES.iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["h264_nvenc", "h264_amf", "h264_qsv"]);
        assert!(HARDWARE_CANDIDATES.iter().all(|c| c.is_hardware()));
    }

    #[test]
    fn test_software_fallback_shape() {
        assert!(!SOFTWARE_ENCODER.is_hardware());
        let args: Vec<_> = SOFTWARE_ENCODER.output_args().collect();
        assert_eq!(args[0], "-c:v");
        assert_eq!(args[1], "libx264");
    }
}
