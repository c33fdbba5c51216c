use anyhow::{ensure, Context, Result};
use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;
use ndarray::Array2;

use crate::config::SpectrogramParams;

const MIN_FREQ: f64 = 0.0;

/// Linear-power mel spectrogram shaped `(frames, n_mels)`.
pub(crate) fn mel_power_spectrogram(
    samples: &[f32],
    params: &SpectrogramParams,
) -> Result<Array2<f64>> {
    ensure!(!samples.is_empty(), "cannot analyse an empty waveform");
    let padded = centre_pad(samples, params.fft_size);

    let stft = spectrum::rstft(&padded, params.fft_size, params.hop_length, WindowType::Hanning);
    let (magnitude, _) = spectrum::complex_to_polar_rstft(&stft);
    let power = analysis::make_power_spectrogram(&magnitude);

    let freqs = spectrum::rfftfreq(params.fft_size, params.sample_rate);
    let filterbank = MelFilterbank::new(
        MIN_FREQ,
        params.sample_rate as f64 / 2.0,
        params.n_mels,
        &freqs,
        true,
    );
    let mel = analysis::mel::make_mel_spectrogram(&power, &filterbank);

    let matrix = array_from_frames(&mel).context("mel filterbank produced ragged frames")?;
    ensure!(matrix.nrows() > 0, "spectrogram has no frames");
    ensure!(
        matrix.ncols() == params.n_mels,
        "expected {} mel bands, got {}",
        params.n_mels,
        matrix.ncols()
    );
    Ok(matrix)
}

/// Pad by `fft_size / 2` on both sides so frame `t` is centred on sample `t * hop`.
///
/// Reflects the signal when it is long enough, otherwise pads with zeros. The
/// result is always at least one window long.
fn centre_pad(samples: &[f32], fft_size: usize) -> Vec<f64> {
    let pad = fft_size / 2;
    let n = samples.len();
    let mut padded = Vec::with_capacity(n + 2 * pad);

    if n > pad {
        padded.extend((1..=pad).rev().map(|i| samples[i] as f64));
        padded.extend(samples.iter().map(|&s| s as f64));
        padded.extend((1..=pad).map(|i| samples[n - 1 - i] as f64));
    } else {
        padded.resize(pad, 0.0);
        padded.extend(samples.iter().map(|&s| s as f64));
        padded.resize(padded.len() + pad, 0.0);
    }

    if padded.len() < fft_size {
        padded.resize(fft_size, 0.0);
    }
    padded
}

fn array_from_frames(frames: &[Vec<f64>]) -> Result<Array2<f64>> {
    let rows = frames.len();
    let cols = frames.first().map_or(0, Vec::len);
    let mut flat = Vec::with_capacity(rows * cols);
    for frame in frames {
        ensure!(frame.len() == cols, "frame length {} != {}", frame.len(), cols);
        flat.extend_from_slice(frame);
    }
    Ok(Array2::from_shape_vec((rows, cols), flat)?)
}
