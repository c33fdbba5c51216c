use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Short-time Fourier and mel filterbank settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramParams {
    /// Rate every file is brought to before analysis
    pub sample_rate: u32,
    pub fft_size: usize,
    pub hop_length: usize,
    pub n_mels: usize,
}

impl Default for SpectrogramParams {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            fft_size: 1024,
            hop_length: 512,
            n_mels: 64,
        }
    }
}

/// Silence splitting settings used for the train split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceParams {
    /// Frames quieter than this many dB below the loudest frame are silence
    pub top_db: f64,
    pub frame_length: usize,
    pub hop_length: usize,
}

impl Default for SilenceParams {
    fn default() -> Self {
        Self {
            top_db: 30.0,
            frame_length: 2048,
            hop_length: 512,
        }
    }
}

/// Everything [`crate::extract_log_mel_feats`] needs besides paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub spectrogram: SpectrogramParams,
    pub silence: SilenceParams,
    /// Seconds of zeros substituted for an empty test file
    pub empty_fill_seconds: f64,
    /// Treat undecodable test files like empty ones instead of aborting
    pub substitute_unreadable: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            spectrogram: SpectrogramParams::default(),
            silence: SilenceParams::default(),
            empty_fill_seconds: 1.0,
            substitute_unreadable: true,
        }
    }
}

impl ExtractConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config: ExtractConfig = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ExtractError> {
        let spec = &self.spectrogram;
        check(spec.sample_rate > 0, "sample_rate must be positive")?;
        check(spec.fft_size > 0, "fft_size must be positive")?;
        check(spec.hop_length > 0, "hop_length must be positive")?;
        check(spec.n_mels > 0, "n_mels must be positive")?;

        let silence = &self.silence;
        check(
            silence.top_db.is_finite() && silence.top_db >= 0.0,
            "silence top_db must be a non-negative number",
        )?;
        check(silence.frame_length > 0, "silence frame_length must be positive")?;
        check(silence.hop_length > 0, "silence hop_length must be positive")?;

        check(
            self.empty_fill_seconds.is_finite() && self.empty_fill_seconds > 0.0,
            "empty_fill_seconds must be positive",
        )?;
        Ok(())
    }
}

fn check(condition: bool, message: &str) -> std::result::Result<(), ExtractError> {
    if condition {
        Ok(())
    } else {
        Err(ExtractError::InvalidConfig(message.to_string()))
    }
}
