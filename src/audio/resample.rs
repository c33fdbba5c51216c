use anyhow::{ensure, Context, Result};
use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler};

use crate::types::AudioData;

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 1;

/// Return `audio` at `target_rate` using rubato's band-limited FFT resampler.
pub fn resample_to(audio: &AudioData, target_rate: u32) -> Result<AudioData> {
    ensure!(audio.sample_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if audio.samples.is_empty() || audio.sample_rate == target_rate {
        return Ok(AudioData {
            samples: audio.samples.clone(),
            sample_rate: target_rate,
        });
    }

    let mut resampler = Fft::<f32>::new(
        audio.sample_rate as usize,
        target_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        1,
        FixedSync::Input,
    )
    .context("failed to construct FFT resampler")?;

    let input_frames = audio.samples.len();
    let output_frames = resampler.process_all_needed_output_len(input_frames);
    let mut samples = vec![0.0f32; output_frames];

    let input = InterleavedSlice::new(&audio.samples, 1, input_frames)
        .context("bad resampler input buffer")?;
    let mut output = InterleavedSlice::new_mut(&mut samples, 1, output_frames)
        .context("bad resampler output buffer")?;

    let (_read, written) = resampler
        .process_all_into_buffer(&input, &mut output, input_frames, None)
        .context("resampling failed")?;
    samples.truncate(written);

    Ok(AudioData {
        samples,
        sample_rate: target_rate,
    })
}
