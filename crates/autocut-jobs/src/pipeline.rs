//! The per-job processing pipeline.
//!
//! Stages run strictly in order: probe, silence segmentation, policy
//! transform, segment extraction, concatenation. The first failing
//! stage aborts the job. Terminal handling deletes the input and
//! scratch space either way; on success an expiry timer purges the
//! output after the retention window.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use autocut_media::fs_utils::{ensure_dir, remove_dir_best_effort, remove_file_best_effort};
use autocut_media::sanitize_stem;
use autocut_models::{CutPolicy, JobId};

use crate::backend::{MediaBackend, SegmentReport};
use crate::config::{
    JobConfig, PROGRESS_CONCAT, PROGRESS_EXTRACTED, PROGRESS_PLANNED, PROGRESS_SEGMENTED,
};
use crate::error::JobResult;
use crate::registry::JobRegistry;

/// Everything a spawned pipeline task needs.
pub(crate) struct PipelineContext {
    pub id: JobId,
    pub input: PathBuf,
    pub policy: CutPolicy,
    pub vad_level: u8,
    pub registry: JobRegistry,
    pub backend: Arc<dyn MediaBackend>,
    pub config: JobConfig,
}

/// Drive one job to a terminal state.
pub(crate) async fn run(ctx: PipelineContext) {
    let id = ctx.id;
    let scratch = ctx.config.work_dir.join(id.to_string());
    let output = output_path(&ctx.config, &ctx.input, id);

    ctx.registry.update(id, |job| job.start());

    match run_stages(&ctx, &scratch, &output).await {
        Ok(()) => {
            ctx.registry.update(id, {
                let output = output.clone();
                move |job| job.complete(output)
            });
            info!(job_id = %id, output = %output.display(), "Job complete");
            cleanup_working_files(&ctx.input, &scratch).await;
            schedule_expiry(ctx, output);
        }
        Err(err) => {
            error!(job_id = %id, "Job failed: {err}");
            cleanup_working_files(&ctx.input, &scratch).await;
            // An errored job must leave no output artifact, partial or
            // otherwise. Cleanup runs before the job flips to Error so
            // an observer of the terminal state never sees leftovers.
            remove_file_best_effort(&output).await;
            ctx.registry.update(id, |job| job.fail(err.to_string()));
        }
    }
}

async fn run_stages(ctx: &PipelineContext, scratch: &Path, output: &Path) -> JobResult<()> {
    let id = ctx.id;
    ensure_dir(scratch).await?;

    let info = ctx.backend.probe(&ctx.input).await?;
    info.ensure_processable()?;

    ctx.registry
        .update(id, |job| job.set_progress(3, "analyzing audio"));

    let (total_duration, silences) = ctx
        .backend
        .segment_silence(&ctx.input, scratch, ctx.vad_level)
        .await?;

    ctx.registry.update(id, |job| {
        job.set_progress(
            PROGRESS_SEGMENTED,
            format!("found {} silence intervals", silences.len()),
        )
    });

    let keeps = ctx.policy.keep_intervals(&silences, total_duration)?;

    ctx.registry.update(id, |job| {
        job.set_progress(
            PROGRESS_PLANNED,
            format!("{} segments to extract", keeps.len()),
        )
    });

    let registry = ctx.registry.clone();
    let report: SegmentReport = Box::new(move |done, total| {
        let span = f64::from(PROGRESS_EXTRACTED - PROGRESS_PLANNED);
        let progress = f64::from(PROGRESS_PLANNED) + span * done as f64 / total as f64;
        registry.update(id, |job| {
            job.set_progress(progress as u8, format!("extracted segment {done}/{total}"))
        });
        // Concatenation begins as soon as the last segment lands.
        if done == total {
            registry.update(id, |job| {
                job.set_progress(PROGRESS_CONCAT, "concatenating segments")
            });
        }
    });

    ctx.backend
        .extract_and_concat(&ctx.input, &keeps, output, scratch, report)
        .await?;

    Ok(())
}

/// Output file name: sanitized input stem plus the job id, keeping the
/// input container.
fn output_path(config: &JobConfig, input: &Path, id: JobId) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .map(sanitize_stem)
        .unwrap_or_else(|| "output".to_string());
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("mp4");
    config.output_dir.join(format!("{stem}_cut_{id}.{ext}"))
}

/// Remove the uploaded input and the per-job scratch directory.
async fn cleanup_working_files(input: &Path, scratch: &Path) {
    remove_file_best_effort(input).await;
    remove_dir_best_effort(scratch).await;
}

/// Purge the output after the retention window and flag the job.
fn schedule_expiry(ctx: PipelineContext, output: PathBuf) {
    let id = ctx.id;
    let retention = ctx.config.retention;
    let registry = ctx.registry;

    tokio::spawn(async move {
        tokio::time::sleep(retention).await;
        remove_file_best_effort(&output).await;
        registry.update(id, |job| job.expire());
        info!(job_id = %id, "Output expired and deleted");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_shape() {
        let config = JobConfig {
            output_dir: PathBuf::from("/out"),
            ..JobConfig::default()
        };
        let id = JobId::new();
        let path = output_path(&config, Path::new("/work/my talk (v2).mkv"), id);

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("my_talk__v2__cut_"));
        assert!(name.ends_with(".mkv"));
        assert!(name.contains(&id.to_string()));
        assert_eq!(path.parent().unwrap(), Path::new("/out"));
    }

    #[test]
    fn test_output_path_without_extension() {
        let config = JobConfig::default();
        let path = output_path(&config, Path::new("noext"), JobId::new());
        assert!(path.to_str().unwrap().ends_with(".mp4"));
    }
}
