//! Cut policies: how detected silence becomes keep/cut decisions.
//!
//! Each variant is pure configuration plus one transform. The shared
//! final step is always the same: clamp the cut spans into the
//! timeline and take the sorted complement as the keep sequence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::{complement, is_sorted_disjoint, merge_touching, TimeInterval};

/// Silence shorter than this is kept untouched in tempo mode.
const TEMPO_SHORT_SECS: f64 = 0.3;
/// Silence at least this long is removed entirely in tempo mode.
const TEMPO_LONG_SECS: f64 = 1.5;
/// Trailing silence retained when tempo mode shortens a pause.
const TEMPO_TAIL_SECS: f64 = 0.3;

/// Errors from policy evaluation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The policy cut the entire timeline; a zero-length output is
    /// reported instead of silently produced.
    #[error("the selected policy would remove the entire video")]
    EmptyResult,
}

/// A cutting policy over a silence-interval sequence.
///
/// Buffers shrink each removed span from both sides: `post_buffer`
/// seconds of silence stay after the preceding speech, `pre_buffer`
/// seconds stay before the following speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CutPolicy {
    /// Mode A: every silence interval is cut (minus buffers).
    RemoveAll { pre_buffer: f64, post_buffer: f64 },
    /// Mode B: only silences strictly longer than `threshold` are cut.
    RemoveLong {
        threshold: f64,
        pre_buffer: f64,
        post_buffer: f64,
    },
    /// Mode C: fixed three-tier pacing rule, no configurable buffers.
    Tempo,
}

impl CutPolicy {
    /// Transform a silence sequence into the keep sequence for
    /// `[0, total_duration)`.
    ///
    /// Deterministic: the same inputs always produce the same keeps.
    pub fn keep_intervals(
        &self,
        silences: &[TimeInterval],
        total_duration: f64,
    ) -> Result<Vec<TimeInterval>, PolicyError> {
        debug_assert!(is_sorted_disjoint(silences));

        let cuts: Vec<TimeInterval> = silences
            .iter()
            .filter_map(|s| self.cut_span(s))
            .filter_map(|c| c.clamp_to(total_duration))
            .collect();
        let cuts = merge_touching(cuts);

        let keeps = complement(&cuts, total_duration);
        if keeps.is_empty() {
            return Err(PolicyError::EmptyResult);
        }
        Ok(keeps)
    }

    /// The span removed from one silence interval, if any.
    fn cut_span(&self, silence: &TimeInterval) -> Option<TimeInterval> {
        match self {
            CutPolicy::RemoveAll {
                pre_buffer,
                post_buffer,
            } => shrink(silence, *pre_buffer, *post_buffer),
            CutPolicy::RemoveLong {
                threshold,
                pre_buffer,
                post_buffer,
            } => {
                // Boundary-exact durations survive: cut only strictly
                // longer silences.
                if silence.duration() > *threshold {
                    shrink(silence, *pre_buffer, *post_buffer)
                } else {
                    None
                }
            }
            CutPolicy::Tempo => {
                let d = silence.duration();
                if d < TEMPO_SHORT_SECS {
                    None
                } else if d < TEMPO_LONG_SECS {
                    // Keep exactly the trailing tail, cut the lead-in.
                    TimeInterval::new(silence.start(), silence.end() - TEMPO_TAIL_SECS)
                } else {
                    Some(*silence)
                }
            }
        }
    }
}

/// Shrink a silence interval by the buffers on each side. Returns
/// `None` when the buffers overlap, i.e. nothing is cut.
fn shrink(silence: &TimeInterval, pre_buffer: f64, post_buffer: f64) -> Option<TimeInterval> {
    TimeInterval::new(silence.start() + post_buffer, silence.end() - pre_buffer)
}
