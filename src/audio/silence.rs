use std::ops::Range;

use crate::config::SilenceParams;
use crate::features::db::AMIN;

/// Split `samples` into non-silent sample ranges.
///
/// Framewise mean-square energy is computed over centred, zero-padded frames
/// and expressed in dB relative to the loudest frame; frames above
/// `-top_db` are kept and contiguous runs become ranges. Range edges fall on
/// frame hops and are clamped to the signal length.
pub fn split_on_silence(samples: &[f32], params: &SilenceParams) -> Vec<Range<usize>> {
    if samples.is_empty() {
        return Vec::new();
    }

    let energies = frame_energies(samples, params.frame_length, params.hop_length);
    let loudest = energies.iter().copied().fold(0.0_f64, f64::max);
    let reference_db = 10.0 * loudest.max(AMIN).log10();
    let floor = -params.top_db;

    let voiced: Vec<bool> = energies
        .iter()
        .map(|&energy| 10.0 * energy.max(AMIN).log10() - reference_db > floor)
        .collect();

    let total = samples.len();
    let to_sample = |frame: usize| (frame * params.hop_length).min(total);

    let mut ranges = Vec::new();
    let mut run_start: Option<usize> = None;
    for (frame, &is_voiced) in voiced.iter().enumerate() {
        match (is_voiced, run_start) {
            (true, None) => run_start = Some(frame),
            (false, Some(start)) => {
                ranges.push(to_sample(start)..to_sample(frame));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        ranges.push(to_sample(start)..to_sample(voiced.len()));
    }

    ranges.retain(|range| !range.is_empty());
    ranges
}

/// Mean-square energy of each centred frame; samples outside the signal count as zero.
fn frame_energies(samples: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    let pad = frame_length / 2;
    let padded_len = samples.len() + 2 * pad;
    if padded_len < frame_length {
        return vec![window_energy(samples, frame_length)];
    }
    let frame_count = 1 + (padded_len - frame_length) / hop_length;

    (0..frame_count)
        .map(|frame| {
            // Frame `frame` spans padded[frame * hop .. frame * hop + frame_length].
            let start = (frame * hop_length).saturating_sub(pad);
            let end = (frame * hop_length + frame_length)
                .saturating_sub(pad)
                .min(samples.len());
            if start >= end {
                0.0
            } else {
                window_energy(&samples[start..end], frame_length)
            }
        })
        .collect()
}

fn window_energy(window: &[f32], frame_length: usize) -> f64 {
    let sum: f64 = window.iter().map(|&s| (s as f64) * (s as f64)).sum();
    sum / frame_length.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect()
    }

    fn params() -> SilenceParams {
        SilenceParams::default()
    }

    #[test]
    fn empty_signal_has_no_segments() {
        assert!(split_on_silence(&[], &params()).is_empty());
    }

    #[test]
    fn continuous_signal_is_one_segment() {
        let samples = square(16_000);
        let ranges = split_on_silence(&samples, &params());
        assert_eq!(ranges, vec![0..16_000]);
    }

    #[test]
    fn all_zero_signal_is_kept_whole() {
        // Every frame sits at the reference level, so nothing is below the floor.
        let ranges = split_on_silence(&vec![0.0; 4_000], &params());
        assert_eq!(ranges, vec![0..4_000]);
    }

    #[test]
    fn gap_splits_signal_on_hop_boundaries() {
        let mut samples = square(8_000);
        samples.extend(vec![0.0; 8_000]);
        samples.extend(square(8_000));

        let ranges = split_on_silence(&samples, &params());
        assert_eq!(ranges, vec![0..9_216, 15_360..24_000]);
    }

    #[test]
    fn quiet_passage_within_top_db_is_not_silence() {
        let mut samples = square(8_000);
        samples.extend(square(8_000).into_iter().map(|s| s * 0.1)); // -20 dB
        samples.extend(square(8_000));

        let ranges = split_on_silence(&samples, &params());
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn short_signal_shorter_than_frame() {
        let samples = square(100);
        let ranges = split_on_silence(&samples, &params());
        assert_eq!(ranges, vec![0..100]);
    }
}
