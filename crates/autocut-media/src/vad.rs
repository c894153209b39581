//! Voice activity based silence detection.
//!
//! Classifies mono 16 kHz PCM in fixed 30 ms frames and collapses
//! consecutive non-voice frames into silence intervals. The classifier
//! is deterministic: the same samples at the same level always yield
//! the same intervals.

use tracing::debug;
use webrtc_vad::{SampleRate, Vad, VadMode};

use autocut_models::TimeInterval;

use crate::error::{MediaError, MediaResult};

/// Analysis sample rate in Hz.
pub const SAMPLE_RATE: usize = 16_000;

/// Frame duration in milliseconds.
pub const FRAME_DURATION_MS: usize = 30;

/// Samples per frame at the analysis rate.
const FRAME_SAMPLES: usize = SAMPLE_RATE * FRAME_DURATION_MS / 1000;

/// Seconds per frame.
const FRAME_SECS: f64 = FRAME_DURATION_MS as f64 / 1000.0;

fn vad_mode(level: u8) -> Option<VadMode> {
    match level {
        0 => Some(VadMode::Quality),
        1 => Some(VadMode::LowBitrate),
        2 => Some(VadMode::Aggressive),
        3 => Some(VadMode::VeryAggressive),
        _ => None,
    }
}

/// Detect silence intervals in mono 16 kHz PCM audio.
///
/// Returns the audio duration derived from the frame count together
/// with the silence intervals, both aligned to frame boundaries. A
/// trailing partial frame is dropped. `level` selects classifier
/// aggressiveness: 0 flags the least audio as silence, 3 the most.
///
/// This is synchronous and CPU-bound; callers on an async runtime
/// should run it inside `spawn_blocking`.
pub fn detect_silence(samples: &[i16], level: u8) -> MediaResult<(f64, Vec<TimeInterval>)> {
    if samples.is_empty() {
        return Err(MediaError::NoAudioData);
    }
    let mode = vad_mode(level).ok_or(MediaError::InvalidVadLevel(level))?;

    let mut vad = Vad::new_with_rate_and_mode(SampleRate::Rate16kHz, mode);

    let mut silences = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut n_frames = 0usize;

    for (idx, frame) in samples.chunks_exact(FRAME_SAMPLES).enumerate() {
        n_frames = idx + 1;

        // The classifier only errors on bad frame sizes, which
        // chunks_exact rules out; treat an error as voice to avoid
        // cutting audio on a classifier hiccup.
        let is_voice = vad.is_voice_segment(frame).unwrap_or(true);

        if is_voice {
            if let Some(start) = run_start.take() {
                push_run(&mut silences, start, idx);
            }
        } else if run_start.is_none() {
            run_start = Some(idx);
        }
    }

    if n_frames == 0 {
        return Err(MediaError::NoAudioData);
    }

    if let Some(start) = run_start {
        push_run(&mut silences, start, n_frames);
    }

    let total = n_frames as f64 * FRAME_SECS;
    debug!(
        frames = n_frames,
        silences = silences.len(),
        level,
        "Silence detection complete"
    );

    Ok((total, silences))
}

fn push_run(silences: &mut Vec<TimeInterval>, start_frame: usize, end_frame: usize) {
    let start = start_frame as f64 * FRAME_SECS;
    let end = end_frame as f64 * FRAME_SECS;
    if let Some(interval) = TimeInterval::new(start, end) {
        silences.push(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames_of(pattern: &[(usize, i16)]) -> Vec<i16> {
        // (n_frames, amplitude) runs; amplitude 0 is digital silence,
        // a square-ish wave near full scale reads as voice energy.
        let mut out = Vec::new();
        for &(frames, amp) in pattern {
            for i in 0..frames * FRAME_SAMPLES {
                let s = if amp == 0 {
                    0
                } else if (i / 20) % 2 == 0 {
                    amp
                } else {
                    -amp
                };
                out.push(s);
            }
        }
        out
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            detect_silence(&[], 2),
            Err(MediaError::NoAudioData)
        ));
    }

    #[test]
    fn test_short_input_rejected() {
        // Less than one frame of samples
        let samples = vec![0i16; FRAME_SAMPLES - 1];
        assert!(matches!(
            detect_silence(&samples, 2),
            Err(MediaError::NoAudioData)
        ));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let samples = vec![0i16; FRAME_SAMPLES];
        assert!(matches!(
            detect_silence(&samples, 4),
            Err(MediaError::InvalidVadLevel(4))
        ));
    }

    #[test]
    fn test_all_silence() {
        let samples = frames_of(&[(100, 0)]);
        let (total, silences) = detect_silence(&samples, 3).unwrap();

        assert!((total - 3.0).abs() < 1e-9);
        assert_eq!(silences.len(), 1);
        assert!((silences[0].start() - 0.0).abs() < 1e-9);
        assert!((silences[0].end() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_alignment_and_determinism() {
        // 50 silent frames, 50 loud, 50 silent
        let samples = frames_of(&[(50, 0), (50, 20_000), (50, 0)]);

        let (total_a, a) = detect_silence(&samples, 3).unwrap();
        let (total_b, b) = detect_silence(&samples, 3).unwrap();

        assert_eq!(total_a, total_b);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.start(), y.start());
            assert_eq!(x.end(), y.end());
        }

        // Every boundary sits on a 30 ms grid point
        for s in &a {
            let start_frames = s.start() / FRAME_SECS;
            let end_frames = s.end() / FRAME_SECS;
            assert!((start_frames - start_frames.round()).abs() < 1e-6);
            assert!((end_frames - end_frames.round()).abs() < 1e-6);
        }

        // The silent head and tail are detected
        assert!(!a.is_empty());
        assert!((a[0].start() - 0.0).abs() < 1e-9);
        assert!((a.last().unwrap().end() - total_a).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_partial_frame_dropped() {
        let mut samples = frames_of(&[(10, 0)]);
        samples.extend(vec![0i16; FRAME_SAMPLES / 2]);

        let (total, _) = detect_silence(&samples, 2).unwrap();
        assert!((total - 0.3).abs() < 1e-9);
    }
}
