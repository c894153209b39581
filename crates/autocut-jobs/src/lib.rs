//! Asynchronous job lifecycle for AutoCut.
//!
//! Accepts validated cutting requests, runs the staged pipeline per
//! job on the tokio runtime, serves status snapshots, and purges
//! outputs after the retention window.

pub mod backend;
pub mod config;
pub mod error;
pub mod manager;
mod pipeline;
pub mod registry;

pub use backend::{FfmpegBackend, MediaBackend, SegmentReport};
pub use config::{JobConfig, DEFAULT_RETENTION_SECS};
pub use error::{JobError, JobResult};
pub use manager::JobManager;
pub use registry::JobRegistry;
