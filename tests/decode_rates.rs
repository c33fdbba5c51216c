mod common;

use std::f32::consts::TAU;
use std::path::Path;

use common::{config, square, write_wav, SAMPLE_RATE};
use melprep::archive::read_archive;
use melprep::audio::decoder::{load_waveform, DecodeOutcome};
use melprep::extract_log_mel_feats;
use melprep::progress::NoProgress;

const NATIVE_RATE: u32 = 48_000;

fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 * (TAU * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

fn decode(path: &Path) -> Vec<f32> {
    match load_waveform(path, SAMPLE_RATE).unwrap() {
        DecodeOutcome::Samples(audio) => {
            assert_eq!(audio.sample_rate, SAMPLE_RATE);
            audio.samples
        }
        DecodeOutcome::Empty => panic!("expected samples from {}", path.display()),
    }
}

#[test]
fn high_rate_file_is_brought_to_configured_rate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone_48k.wav");
    write_wav(&path, &sine(1_000.0, NATIVE_RATE, NATIVE_RATE as usize), NATIVE_RATE);

    let samples = decode(&path);
    let expected = SAMPLE_RATE as i64;
    assert!(
        (samples.len() as i64 - expected).abs() <= expected / 100,
        "got {} samples",
        samples.len()
    );
    // In-band tone keeps its level (0.5 / sqrt(2)).
    let middle = &samples[4_000..12_000];
    assert!((rms(middle) - 0.3536).abs() < 0.02, "rms {}", rms(middle));
}

#[test]
fn content_above_target_nyquist_does_not_alias() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("whine_48k.wav");
    // 10 kHz folds to 6 kHz at 16 kHz unless it is filtered out first.
    write_wav(&path, &sine(10_000.0, NATIVE_RATE, NATIVE_RATE as usize), NATIVE_RATE);

    let samples = decode(&path);
    let middle = &samples[4_000..12_000];
    assert!(rms(middle) < 0.01, "aliased energy rms {}", rms(middle));
}

#[test]
fn low_rate_file_is_upsampled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone_8k.wav");
    write_wav(&path, &sine(500.0, 8_000, 8_000), 8_000);

    let samples = decode(&path);
    let expected = SAMPLE_RATE as i64;
    assert!((samples.len() as i64 - expected).abs() <= expected / 100);
    let middle = &samples[4_000..12_000];
    assert!((rms(middle) - 0.3536).abs() < 0.02);
}

#[test]
fn mixed_rate_directory_yields_matching_frame_counts() {
    let audio = tempfile::tempdir().unwrap();
    write_wav(
        &audio.path().join("a_native.wav"),
        &square(SAMPLE_RATE as usize),
        SAMPLE_RATE,
    );
    write_wav(
        &audio.path().join("b_48k.wav"),
        &sine(1_000.0, NATIVE_RATE, NATIVE_RATE as usize),
        NATIVE_RATE,
    );
    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join("test.bin");

    extract_log_mel_feats(
        "test",
        None,
        audio.path(),
        &out,
        &config(1024, 32),
        &mut NoProgress,
    )
    .unwrap();

    let archive = read_archive(&out).unwrap();
    assert_eq!(archive.records.len(), 2);
    assert_eq!(archive.records[0].feature.dim(), archive.records[1].feature.dim());
}
