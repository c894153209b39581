//! Shared data models for the AutoCut silence-cutting pipeline.
//!
//! This crate provides the pure, I/O-free core:
//! - Half-open time intervals and their sequence algebra
//! - Cut policies (Mode A/B/C) as closed tagged variants
//! - Job records with a sticky-terminal state machine
//! - Submission parameters and their validation

pub mod interval;
pub mod job;
pub mod params;
pub mod policy;

// Re-export common types
pub use interval::{complement, is_sorted_disjoint, merge_touching, TimeInterval};
pub use job::{Job, JobId, JobSnapshot, JobStatus};
pub use params::{is_supported_container, CutMode, ParamsError, SubmitParams, ALLOWED_EXTENSIONS};
pub use policy::{CutPolicy, PolicyError};
