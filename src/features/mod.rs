pub mod db;
mod mel;

use anyhow::Result;
use ndarray::Array2;

use crate::config::SpectrogramParams;

/// Computes log-mel matrices for waveforms already at the configured rate.
#[derive(Debug, Clone)]
pub struct LogMelExtractor {
    params: SpectrogramParams,
}

impl LogMelExtractor {
    pub fn new(params: SpectrogramParams) -> Self {
        Self { params }
    }

    /// Log-mel features shaped `(n_mels, frames)`, in dB relative to the peak of `samples`.
    pub fn extract(&self, samples: &[f32]) -> Result<Array2<f32>> {
        let mel = mel::mel_power_spectrogram(samples, &self.params)?;
        let log_mel = db::power_to_db(&mel, Some(db::TOP_DB));
        Ok(log_mel
            .reversed_axes()
            .as_standard_layout()
            .mapv(|value| value as f32))
    }
}
