//! FFmpeg CLI wrapper and silence segmentation for AutoCut.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with streamed `-progress` parsing
//! - ffprobe media inspection
//! - Hardware encoder capability detection with process-lifetime caching
//! - Audio extraction plus WebRTC VAD silence segmentation
//! - Keep-interval extraction and lossless concatenation

pub mod audio;
pub mod command;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod fs_utils;
pub mod probe;
pub mod progress;
pub mod vad;

pub use audio::extract_pcm;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use encoder::{Encoder, EncoderDetector};
pub use error::{MediaError, MediaResult};
pub use extract::extract_and_concat;
pub use fs_utils::sanitize_stem;
pub use probe::{probe_media, MediaInfo};
pub use progress::FfmpegProgress;
pub use vad::{detect_silence, FRAME_DURATION_MS, SAMPLE_RATE};
