//! Media backend seam.
//!
//! The pipeline talks to media tooling through this trait so the
//! lifecycle tests can run against a scripted fake instead of FFmpeg.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use autocut_media::{
    check_ffmpeg, check_ffprobe, detect_silence, extract_pcm, probe_media, EncoderDetector,
    MediaError, MediaInfo, MediaResult,
};
use autocut_models::TimeInterval;

/// Per-segment completion callback: (completed, total).
pub type SegmentReport = Box<dyn FnMut(usize, usize) + Send>;

#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Inspect the input container.
    async fn probe(&self, input: &Path) -> MediaResult<MediaInfo>;

    /// Decode the audio track and classify silence.
    ///
    /// Returns the analyzed duration and the silence intervals.
    async fn segment_silence(
        &self,
        input: &Path,
        scratch: &Path,
        vad_level: u8,
    ) -> MediaResult<(f64, Vec<TimeInterval>)>;

    /// Extract the keep intervals and join them into `output`.
    async fn extract_and_concat(
        &self,
        input: &Path,
        keeps: &[TimeInterval],
        output: &Path,
        scratch: &Path,
        report: SegmentReport,
    ) -> MediaResult<()>;
}

/// The production backend, driving FFmpeg via `autocut-media`.
#[derive(Debug)]
pub struct FfmpegBackend {
    encoders: EncoderDetector,
}

impl FfmpegBackend {
    /// Verify the required tools exist and build the backend.
    pub fn new() -> MediaResult<Self> {
        let ffmpeg = check_ffmpeg()?;
        let ffprobe = check_ffprobe()?;
        info!(
            ffmpeg = %ffmpeg.display(),
            ffprobe = %ffprobe.display(),
            "Media tooling located"
        );
        Ok(Self {
            encoders: EncoderDetector::new(),
        })
    }
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    async fn probe(&self, input: &Path) -> MediaResult<MediaInfo> {
        probe_media(input).await
    }

    async fn segment_silence(
        &self,
        input: &Path,
        scratch: &Path,
        vad_level: u8,
    ) -> MediaResult<(f64, Vec<TimeInterval>)> {
        let samples = extract_pcm(input, scratch).await?;

        // The classifier holds non-Send state; run it off the runtime.
        tokio::task::spawn_blocking(move || detect_silence(&samples, vad_level))
            .await
            .map_err(|e| MediaError::internal(format!("segmentation task failed: {e}")))?
    }

    async fn extract_and_concat(
        &self,
        input: &Path,
        keeps: &[TimeInterval],
        output: &Path,
        scratch: &Path,
        report: SegmentReport,
    ) -> MediaResult<()> {
        let encoder = self.encoders.select().await?;
        autocut_media::extract_and_concat(input, keeps, encoder, scratch, output, report).await
    }
}
