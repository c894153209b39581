//! Job-level error taxonomy.
//!
//! These messages are user-visible. Conversions from lower layers keep
//! the distinction between bad input and processing failure but drop
//! filesystem paths and raw tool output; the pipeline logs the
//! underlying detail before converting.

use autocut_models::{ParamsError, PolicyError};
use autocut_media::MediaError;
use thiserror::Error;

/// Result type for job operations.
pub type JobResult<T> = Result<T, JobError>;

#[derive(Debug, Error, PartialEq)]
pub enum JobError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("input cannot be processed: {0}")]
    UnprocessableInput(String),

    #[error("audio decoding failed: {0}")]
    DecodeError(String),

    #[error("the selected policy would remove the entire video")]
    EmptyResult,

    #[error("extraction of segment {index} ({start:.3}s - {end:.3}s) failed")]
    SegmentExtractionFailed { index: usize, start: f64, end: f64 },

    #[error("joining segments failed: {0}")]
    ConcatenationFailed(String),

    #[error("the output has expired and was deleted")]
    Expired,

    #[error("no such job")]
    NotFound,

    #[error("the job has not produced an output")]
    NotReady,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<MediaError> for JobError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::FileNotFound(_) => {
                JobError::UnprocessableInput("input file not found".into())
            }
            MediaError::NoAudioStream => {
                JobError::UnprocessableInput("input has no audio stream".into())
            }
            MediaError::ZeroDuration => {
                JobError::UnprocessableInput("input has zero duration".into())
            }
            MediaError::NoAudioData => {
                JobError::UnprocessableInput("input contains no decodable audio".into())
            }
            MediaError::DecodeFailed(_) => {
                JobError::DecodeError("the audio track could not be decoded".into())
            }
            MediaError::InvalidVadLevel(level) => {
                JobError::InvalidParameters(format!("vad_level must be 0-3, got {level}"))
            }
            MediaError::SegmentExtraction {
                index, start, end, ..
            } => JobError::SegmentExtractionFailed { index, start, end },
            MediaError::Concatenation(_) => {
                JobError::ConcatenationFailed("the segments could not be joined".into())
            }
            MediaError::FfmpegNotFound | MediaError::FfprobeNotFound => {
                JobError::Internal("media tooling unavailable".into())
            }
            MediaError::FfmpegFailed { .. }
            | MediaError::FfprobeFailed { .. }
            | MediaError::Io(_)
            | MediaError::JsonParse(_)
            | MediaError::Internal(_) => JobError::Internal("processing failed".into()),
        }
    }
}

impl From<PolicyError> for JobError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::EmptyResult => JobError::EmptyResult,
        }
    }
}

impl From<ParamsError> for JobError {
    fn from(err: ParamsError) -> Self {
        JobError::InvalidParameters(err.to_string())
    }
}
