//! Segment extraction and concatenation.
//!
//! Each kept interval is re-encoded into its own part file with reset
//! timestamps, then the parts are joined with the concat demuxer in
//! stream-copy mode. Part files and the list file live in a scratch
//! subdirectory that is removed on every exit path.

use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

use autocut_models::TimeInterval;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::encoder::Encoder;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{ensure_dir, remove_dir_best_effort, remove_file_best_effort};

/// Extract `keeps` from `input` and concatenate them into `output`.
///
/// `report` is called after each finished segment with the number of
/// completed segments and the total. Fails on the first segment that
/// cannot be extracted.
pub async fn extract_and_concat<F>(
    input: impl AsRef<Path>,
    keeps: &[TimeInterval],
    encoder: &Encoder,
    scratch_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    mut report: F,
) -> MediaResult<()>
where
    F: FnMut(usize, usize),
{
    let input = input.as_ref();
    let output = output.as_ref();

    if keeps.is_empty() {
        return Err(MediaError::internal("no segments to extract"));
    }

    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("mp4")
        .to_string();

    let parts_dir = scratch_dir.as_ref().join("parts");
    ensure_dir(&parts_dir).await?;

    let result = run_extraction(input, keeps, encoder, &parts_dir, output, &ext, &mut report).await;

    remove_dir_best_effort(&parts_dir).await;
    result
}

async fn run_extraction<F>(
    input: &Path,
    keeps: &[TimeInterval],
    encoder: &Encoder,
    parts_dir: &Path,
    output: &Path,
    ext: &str,
    report: &mut F,
) -> MediaResult<()>
where
    F: FnMut(usize, usize),
{
    let runner = FfmpegRunner::new();
    let total = keeps.len();
    let mut part_paths = Vec::with_capacity(total);

    for (index, keep) in keeps.iter().enumerate() {
        let part = parts_dir.join(format!("part_{index:04}.{ext}"));

        let cmd = FfmpegCommand::new(input, &part)
            .seek(keep.start())
            .duration(keep.duration())
            .output_args(encoder.output_args())
            .video_filter("setpts=PTS-STARTPTS")
            .audio_codec("aac")
            .audio_bitrate("192k")
            .audio_filter("asetpts=PTS-STARTPTS");

        runner.run(&cmd).await.map_err(|e| {
            let message = match e {
                MediaError::FfmpegFailed { message, stderr, .. } => {
                    stderr.unwrap_or(message)
                }
                other => other.to_string(),
            };
            MediaError::SegmentExtraction {
                index,
                start: keep.start(),
                end: keep.end(),
                message,
            }
        })?;

        debug!(index, start = keep.start(), end = keep.end(), "Segment extracted");
        part_paths.push(part);
        report(index + 1, total);
    }

    if let Err(e) = concat_parts(&part_paths, parts_dir, output).await {
        // FFmpeg runs with -y; a failed concat can leave a partial
        // output file behind.
        remove_file_best_effort(output).await;
        return Err(e);
    }

    info!(segments = total, output = %output.display(), "Concatenation complete");
    Ok(())
}

/// Join part files with the concat demuxer without re-encoding.
async fn concat_parts(parts: &[std::path::PathBuf], parts_dir: &Path, output: &Path) -> MediaResult<()> {
    let mut list = String::new();
    for part in parts {
        // Concat list entries are single-quoted; embedded quotes use
        // the '\'' escape.
        let escaped = part.to_string_lossy().replace('\'', "'\\''");
        writeln!(list, "file '{escaped}'")
            .map_err(|e| MediaError::internal(format!("concat list: {e}")))?;
    }

    let list_path = parts_dir.join("concat.txt");
    tokio::fs::write(&list_path, list).await?;

    let cmd = FfmpegCommand::new(&list_path, output)
        .input_args(["-f", "concat", "-safe", "0"])
        .output_args(["-c", "copy"]);

    FfmpegRunner::new().run(&cmd).await.map_err(|e| {
        let message = match e {
            MediaError::FfmpegFailed { message, stderr, .. } => stderr.unwrap_or(message),
            other => other.to_string(),
        };
        MediaError::Concatenation(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_keep_list_rejected() {
        let scratch = tempfile::tempdir().unwrap();

        let err = extract_and_concat(
            "/nonexistent/in.mp4",
            &[],
            &crate::encoder::SOFTWARE_ENCODER,
            scratch.path(),
            scratch.path().join("out.mp4"),
            |_, _| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::Internal(_)));
    }

    #[test]
    fn test_concat_list_escaping() {
        let part = std::path::PathBuf::from("/tmp/it's here/part_0000.mp4");
        let escaped = part.to_string_lossy().replace('\'', "'\\''");
        assert_eq!(escaped, "/tmp/it'\\''s here/part_0000.mp4");
    }
}
