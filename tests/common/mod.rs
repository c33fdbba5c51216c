#![allow(dead_code)]

use std::fs;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use melprep::progress::Progress;
use melprep::{ExtractConfig, SplitType};

pub const SAMPLE_RATE: u32 = 16_000;

/// 1 kHz square wave at 16 kHz; every sample carries the same energy.
pub fn square(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| if (i / 8) % 2 == 0 { 0.5 } else { -0.5 })
        .collect()
}

pub fn silence(len: usize) -> Vec<f32> {
    vec![0.0; len]
}

pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("create wav");
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

pub fn write_manifest(path: &Path, rows: &[(&str, &str)]) {
    let body: String = rows
        .iter()
        .map(|(file, label)| format!("{file}\tspk\tsess\t1.0\t{label}\n"))
        .collect();
    fs::write(path, body).expect("write manifest");
}

pub fn config(fft_size: usize, n_mels: usize) -> ExtractConfig {
    let mut config = ExtractConfig::default();
    config.spectrogram.sample_rate = SAMPLE_RATE;
    config.spectrogram.fft_size = fft_size;
    config.spectrogram.hop_length = 512;
    config.spectrogram.n_mels = n_mels;
    config
}

/// Records every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub started: Option<(SplitType, usize)>,
    pub files: Vec<(String, usize)>,
    pub finished: Option<usize>,
}

impl Progress for RecordingProgress {
    fn started(&mut self, split: SplitType, total_files: usize) {
        self.started = Some((split, total_files));
    }

    fn file_done(&mut self, _index: usize, file_name: &str, records: usize) {
        self.files.push((file_name.to_string(), records));
    }

    fn finished(&mut self, total_records: usize) {
        self.finished = Some(total_records);
    }
}
