//! Half-open time intervals on the source video timeline.
//!
//! Every sequence of intervals produced anywhere in the pipeline keeps
//! the same invariant: ascending order, pairwise disjoint, positive
//! length. Producers uphold it, consumers may assume it.

use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` in seconds on the source timeline.
///
/// Construction is the only place the `end > start` invariant is
/// checked; an instance that exists is always non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    start: f64,
    end: f64,
}

impl TimeInterval {
    /// Create an interval, or `None` if the bounds are not a valid
    /// non-empty half-open range.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if start.is_finite() && end.is_finite() && start >= 0.0 && end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Start time in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End time in seconds (exclusive).
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Clamp this interval into `[0, total)`. Returns `None` if nothing
    /// remains after clamping.
    pub fn clamp_to(&self, total: f64) -> Option<Self> {
        Self::new(self.start.max(0.0), self.end.min(total))
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3}s, {:.3}s)", self.start, self.end)
    }
}

/// Check the sequence invariant: ascending, pairwise disjoint.
pub fn is_sorted_disjoint(intervals: &[TimeInterval]) -> bool {
    intervals
        .windows(2)
        .all(|pair| pair[0].end <= pair[1].start)
}

/// Merge overlapping or touching intervals into a minimal disjoint
/// sequence. Input must already be sorted by start.
pub fn merge_touching(intervals: Vec<TimeInterval>) -> Vec<TimeInterval> {
    let mut merged: Vec<TimeInterval> = Vec::with_capacity(intervals.len());

    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end => {
                last.end = last.end.max(iv.end);
            }
            _ => merged.push(iv),
        }
    }

    merged
}

/// Sorted complement of `cuts` within `[0, total)`.
///
/// `cuts` must be sorted, disjoint, and already clamped into
/// `[0, total)`. Zero-length gaps are not emitted, so the result
/// upholds the sequence invariant.
pub fn complement(cuts: &[TimeInterval], total: f64) -> Vec<TimeInterval> {
    debug_assert!(is_sorted_disjoint(cuts));

    let mut keeps = Vec::with_capacity(cuts.len() + 1);
    let mut cursor = 0.0;

    for cut in cuts {
        if let Some(gap) = TimeInterval::new(cursor, cut.start) {
            keeps.push(gap);
        }
        cursor = cut.end;
    }

    if let Some(tail) = TimeInterval::new(cursor, total) {
        keeps.push(tail);
    }

    keeps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: f64, end: f64) -> TimeInterval {
        TimeInterval::new(start, end).unwrap()
    }

    #[test]
    fn test_interval_construction() {
        assert!(TimeInterval::new(0.0, 1.0).is_some());
        assert!(TimeInterval::new(1.0, 1.0).is_none());
        assert!(TimeInterval::new(2.0, 1.0).is_none());
        assert!(TimeInterval::new(-1.0, 1.0).is_none());
        assert!(TimeInterval::new(0.0, f64::NAN).is_none());
    }

    #[test]
    fn test_duration() {
        assert!((iv(1.5, 4.0).duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_to() {
        let clamped = iv(5.0, 20.0).clamp_to(10.0).unwrap();
        assert_eq!(clamped.start(), 5.0);
        assert_eq!(clamped.end(), 10.0);

        // Entirely past the end: nothing remains
        assert!(iv(12.0, 20.0).clamp_to(10.0).is_none());
    }

    #[test]
    fn test_sorted_disjoint_invariant() {
        assert!(is_sorted_disjoint(&[]));
        assert!(is_sorted_disjoint(&[iv(0.0, 1.0)]));
        assert!(is_sorted_disjoint(&[iv(0.0, 1.0), iv(1.0, 2.0)]));
        assert!(!is_sorted_disjoint(&[iv(0.0, 1.5), iv(1.0, 2.0)]));
        assert!(!is_sorted_disjoint(&[iv(2.0, 3.0), iv(0.0, 1.0)]));
    }

    #[test]
    fn test_merge_touching() {
        let merged = merge_touching(vec![iv(0.0, 1.0), iv(1.0, 2.0), iv(3.0, 4.0)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].end(), 2.0);
        assert_eq!(merged[1].start(), 3.0);
    }

    #[test]
    fn test_merge_overlapping() {
        let merged = merge_touching(vec![iv(0.0, 2.0), iv(1.0, 1.5), iv(1.8, 3.0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start(), 0.0);
        assert_eq!(merged[0].end(), 3.0);
    }

    #[test]
    fn test_complement_empty_cuts() {
        let keeps = complement(&[], 10.0);
        assert_eq!(keeps, vec![iv(0.0, 10.0)]);
    }

    #[test]
    fn test_complement_full_cut() {
        let keeps = complement(&[iv(0.0, 10.0)], 10.0);
        assert!(keeps.is_empty());
    }

    #[test]
    fn test_complement_reconstructs_timeline() {
        let cuts = vec![iv(0.0, 1.0), iv(3.0, 4.0), iv(9.5, 10.0)];
        let keeps = complement(&cuts, 10.0);
        assert_eq!(keeps, vec![iv(1.0, 3.0), iv(4.0, 9.5)]);

        // Union of cuts and keeps covers [0, total) with no overlap
        let mut all: Vec<_> = cuts.iter().chain(keeps.iter()).copied().collect();
        all.sort_by(|a, b| a.start().partial_cmp(&b.start()).unwrap());
        assert!(is_sorted_disjoint(&all));
        let covered: f64 = all.iter().map(|i| i.duration()).sum();
        assert!((covered - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_complement_cut_at_edges() {
        let keeps = complement(&[iv(0.0, 2.0), iv(8.0, 10.0)], 10.0);
        assert_eq!(keeps, vec![iv(2.0, 8.0)]);
    }
}
