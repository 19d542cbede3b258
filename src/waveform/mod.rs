//! Bar-height magnitudes for the record screen, preview card and message rows
//!
//! Everything here is display state derived from "is something active" or
//! from real amplitude data. Nothing in the session state machines reads it.

mod sampler;

pub use sampler::{BarCycle, WaveformSampler};

use rand::Rng;

/// Resting magnitude of an inactive bar
pub const IDLE_FLOOR: f32 = 0.1;

/// Range of random targets while active
pub const ACTIVE_MIN: f32 = 0.2;
pub const ACTIVE_MAX: f32 = 1.0;

/// Preview-card bars are drawn once in this range
const PREVIEW_MIN: f32 = 0.5;

/// Message-row bars alternate between full and this height
const ROW_SHORT_BAR: f32 = 2.0 / 3.0;

/// Static bars for the preview card, drawn once per clip
pub fn preview_bars<R: Rng + ?Sized>(bar_count: usize, rng: &mut R) -> Vec<f32> {
    (0..bar_count)
        .map(|_| rng.random_range(PREVIEW_MIN..=ACTIVE_MAX))
        .collect()
}

/// Static bars for a message row: tall, short, tall, short...
pub fn row_bars(bar_count: usize) -> Vec<f32> {
    (0..bar_count)
        .map(|i| if i % 2 == 0 { 1.0 } else { ROW_SHORT_BAR })
        .collect()
}

/// Bars from a real PCM buffer: RMS per bucket, normalised to the loudest
///
/// Silence and empty input produce all-zero bars.
pub fn bars_from_samples(samples: &[f32], bar_count: usize) -> Vec<f32> {
    if bar_count == 0 {
        return Vec::new();
    }

    if samples.is_empty() {
        return vec![0.0; bar_count];
    }

    let chunk_size = samples.len().div_ceil(bar_count);

    let mut rms_values: Vec<f32> = samples
        .chunks(chunk_size)
        .map(|chunk| {
            let sum_squares: f32 = chunk.iter().map(|s| s * s).sum();
            (sum_squares / chunk.len() as f32).sqrt()
        })
        .collect();
    rms_values.resize(bar_count, 0.0);

    let max_rms = rms_values.iter().copied().fold(0.0f32, f32::max);
    if max_rms < f32::EPSILON {
        return vec![0.0; bar_count];
    }

    rms_values
        .iter()
        .map(|rms| (rms / max_rms).clamp(0.0, 1.0))
        .collect()
}
