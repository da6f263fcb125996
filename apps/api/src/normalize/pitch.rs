//! Pitch analysis — YIN fundamental-frequency estimation over a mono waveform, reduced to
//! mean / standard deviation over voiced frames and a 0–100 "speaking confidence" score.
//!
//! The score is a crude proxy: `clamp(100 - 1.5 × std_hz, 0, 100)`. Steadier pitch scores higher.
//!
//! Frames whose RMS falls below `SILENCE_RMS` are unvoiced and report f0 = 0. When no frame is
//! voiced the analysis returns `PitchOutcome::NoValidPitch` instead of statistics.
//! CPU-bound: callers on the async runtime should wrap `analyze` in `spawn_blocking`.

use serde::Serialize;

pub const FMIN_HZ: f32 = 50.0;
pub const FMAX_HZ: f32 = 400.0;
pub const FRAME_LENGTH: usize = 2048;
pub const HOP_LENGTH: usize = FRAME_LENGTH / 4;
const TROUGH_THRESHOLD: f32 = 0.1;
const SILENCE_RMS: f32 = 1e-4;

/// Message surfaced when a clip has no voiced frames.
pub const NO_VALID_PITCH: &str = "No valid pitch detected.";

/// Summary statistics over voiced frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchAnalysis {
    pub mean_hz: f32,
    pub std_hz: f32,
    /// 0.0 – 100.0
    pub confidence: f32,
    pub voiced_frames: usize,
    pub total_frames: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PitchOutcome {
    NoValidPitch,
    Voiced(PitchAnalysis),
}

/// Linear map from pitch variability to a bounded confidence score.
pub fn confidence_from_variability(std_hz: f32) -> f32 {
    if !std_hz.is_finite() {
        return 0.0;
    }
    (100.0 - std_hz * 1.5).clamp(0.0, 100.0)
}

/// Runs YIN over the waveform and summarizes the voiced frames.
pub fn analyze(samples: &[f32], sample_rate: u32) -> PitchOutcome {
    let f0 = yin(samples, sample_rate);
    let voiced: Vec<f32> = f0.iter().copied().filter(|&f| f > 0.0).collect();
    if voiced.is_empty() {
        return PitchOutcome::NoValidPitch;
    }

    let n = voiced.len() as f32;
    let mean = voiced.iter().sum::<f32>() / n;
    let variance = voiced.iter().map(|f| (f - mean).powi(2)).sum::<f32>() / n;
    let std = variance.sqrt();

    PitchOutcome::Voiced(PitchAnalysis {
        mean_hz: mean,
        std_hz: std,
        confidence: confidence_from_variability(std),
        voiced_frames: voiced.len(),
        total_frames: f0.len(),
    })
}

/// Per-frame f0 estimates in Hz; 0.0 marks an unvoiced frame.
///
/// Frames are centred (the signal is zero-padded by half a frame on each side), so the
/// estimate for frame `i` describes the neighbourhood of sample `i * HOP_LENGTH`.
pub fn yin(samples: &[f32], sample_rate: u32) -> Vec<f32> {
    if samples.is_empty() || sample_rate == 0 {
        return Vec::new();
    }
    let sr = sample_rate as f32;
    let min_period = ((sr / FMAX_HZ).floor() as usize).max(1);
    let max_period = ((sr / FMIN_HZ).ceil() as usize).min(FRAME_LENGTH / 2);
    if min_period >= max_period {
        return Vec::new();
    }

    let pad = FRAME_LENGTH / 2;
    let mut padded = vec![0.0_f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let n_frames = 1 + (padded.len() - FRAME_LENGTH) / HOP_LENGTH;
    let mut diff = vec![0.0_f32; max_period + 1];
    let mut cmnd = vec![1.0_f32; max_period + 1];

    (0..n_frames)
        .map(|i| {
            let frame = &padded[i * HOP_LENGTH..i * HOP_LENGTH + FRAME_LENGTH];
            frame_pitch(frame, sr, min_period, max_period, &mut diff, &mut cmnd)
        })
        .collect()
}

fn frame_pitch(
    frame: &[f32],
    sr: f32,
    min_period: usize,
    max_period: usize,
    diff: &mut [f32],
    cmnd: &mut [f32],
) -> f32 {
    let energy = frame.iter().map(|x| x * x).sum::<f32>() / frame.len() as f32;
    if energy.sqrt() < SILENCE_RMS {
        return 0.0;
    }

    // Difference function over a window that stays inside the frame for every lag.
    let window = frame.len() - max_period;
    for (tau, d) in diff.iter_mut().enumerate().take(max_period + 1).skip(1) {
        *d = (0..window)
            .map(|j| {
                let delta = frame[j] - frame[j + tau];
                delta * delta
            })
            .sum();
    }

    // Cumulative mean normalized difference.
    cmnd[0] = 1.0;
    let mut running = 0.0_f32;
    for tau in 1..=max_period {
        running += diff[tau];
        cmnd[tau] = if running > 0.0 {
            diff[tau] * tau as f32 / running
        } else {
            1.0
        };
    }

    // First trough under the threshold, else the global minimum in range.
    let tau = (min_period..max_period)
        .find(|&t| cmnd[t] < TROUGH_THRESHOLD)
        .map(|mut t| {
            while t + 1 < max_period && cmnd[t + 1] < cmnd[t] {
                t += 1;
            }
            t
        })
        .unwrap_or_else(|| {
            (min_period..=max_period)
                .min_by(|&a, &b| cmnd[a].total_cmp(&cmnd[b]))
                .unwrap_or(min_period)
        });

    // Parabolic interpolation around the trough.
    let shift = if tau > 0 && tau < max_period {
        let (s0, s1, s2) = (cmnd[tau - 1], cmnd[tau], cmnd[tau + 1]);
        let denom = s0 - 2.0 * s1 + s2;
        if denom.abs() > f32::EPSILON {
            (0.5 * (s0 - s2) / denom).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    } else {
        0.0
    };

    (sr / (tau as f32 + shift)).clamp(FMIN_HZ, FMAX_HZ)
}
