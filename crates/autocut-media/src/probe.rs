//! FFprobe media inspection.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Media file information relevant to the cutting pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Whether the file carries an audio stream
    pub has_audio: bool,
    /// Whether the file carries a video stream
    pub has_video: bool,
    /// Container format name as reported by ffprobe
    pub format_name: String,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    format_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
}

/// Probe a media file.
pub async fn probe_media(path: impl AsRef<Path>) -> MediaResult<MediaInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: "FFprobe failed".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    let duration = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(MediaInfo {
        duration,
        has_audio: probe.streams.iter().any(|s| s.codec_type == "audio"),
        has_video: probe.streams.iter().any(|s| s.codec_type == "video"),
        format_name: probe.format.format_name.unwrap_or_default(),
    })
}

impl MediaInfo {
    /// Reject inputs the segmenter cannot work with.
    pub fn ensure_processable(&self) -> MediaResult<()> {
        if !self.has_audio {
            return Err(MediaError::NoAudioStream);
        }
        if self.duration <= 0.0 {
            return Err(MediaError::ZeroDuration);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(duration: f64, has_audio: bool) -> MediaInfo {
        MediaInfo {
            duration,
            has_audio,
            has_video: true,
            format_name: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
        }
    }

    #[test]
    fn test_ensure_processable() {
        assert!(info(10.0, true).ensure_processable().is_ok());
        assert!(matches!(
            info(10.0, false).ensure_processable(),
            Err(MediaError::NoAudioStream)
        ));
        assert!(matches!(
            info(0.0, true).ensure_processable(),
            Err(MediaError::ZeroDuration)
        ));
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let err = probe_media("/nonexistent/clip.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
