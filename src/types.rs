//! Core types for the melprep feature extraction pipeline

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Raw audio data representation (mono, f32 samples)
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 16000)
    pub sample_rate: u32,
}

impl AudioData {
    /// Zero-filled buffer of `seconds` duration.
    pub fn silence(seconds: f64, sample_rate: u32) -> Self {
        let num_samples = (seconds * sample_rate as f64).round() as usize;
        Self {
            samples: vec![0.0; num_samples],
            sample_rate,
        }
    }
}

/// Which half of the dataset is being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Manifest-driven, silence-segmented, labelled records.
    Train,
    /// Directory-driven, one unlabelled record per file.
    Test,
}

impl SplitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Train => "train",
            SplitType::Test => "test",
        }
    }
}

impl FromStr for SplitType {
    type Err = ExtractError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "train" => Ok(SplitType::Train),
            "test" => Ok(SplitType::Test),
            _ => Err(ExtractError::UnsupportedSplitType(raw.to_string())),
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the training manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// File name relative to the audio directory
    pub file_name: String,
    /// Duration column as written in the manifest (seconds)
    pub duration: Option<f64>,
    pub label: String,
}

/// Log-mel features for one analysed span of audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub file_name: String,
    /// Shape `(n_mels, frames)`, values in dB relative to the span's peak
    pub feature: Array2<f32>,
    /// Dense label id; `None` for test records
    pub label_id: Option<u32>,
}

impl FeatureRecord {
    pub fn mel_bands(&self) -> usize {
        self.feature.nrows()
    }

    pub fn frames(&self) -> usize {
        self.feature.ncols()
    }
}
