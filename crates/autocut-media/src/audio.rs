//! Audio track extraction for analysis.

use std::path::Path;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::vad::SAMPLE_RATE;

/// Decode the audio track of `input` to mono 16 kHz signed 16-bit PCM.
///
/// The raw stream is written to a scratch file and read back; the
/// scratch file is removed before returning.
pub async fn extract_pcm(
    input: impl AsRef<Path>,
    scratch_dir: impl AsRef<Path>,
) -> MediaResult<Vec<i16>> {
    let input = input.as_ref();
    let scratch_dir = scratch_dir.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    tokio::fs::create_dir_all(scratch_dir).await?;
    let pcm_path = scratch_dir.join("analysis.pcm");

    let cmd = FfmpegCommand::new(input, &pcm_path)
        .output_args(["-vn", "-ac", "1", "-ar"])
        .output_arg(SAMPLE_RATE.to_string())
        .output_args(["-f", "s16le"]);

    let result = FfmpegRunner::new().run(&cmd).await;
    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&pcm_path).await;
        return Err(match e {
            MediaError::FfmpegFailed { message, stderr, .. } => {
                let detail = stderr.unwrap_or(message);
                MediaError::DecodeFailed(detail)
            }
            other => other,
        });
    }

    let bytes = tokio::fs::read(&pcm_path).await?;
    let _ = tokio::fs::remove_file(&pcm_path).await;

    if bytes.is_empty() {
        return Err(MediaError::NoAudioData);
    }

    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();

    debug!(
        samples = samples.len(),
        seconds = samples.len() as f64 / SAMPLE_RATE as f64,
        "Decoded analysis audio"
    );

    Ok(samples)
}
