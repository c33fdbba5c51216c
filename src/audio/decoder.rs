use crate::audio::resample::resample_to;
use crate::types::AudioData;
use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, SampleBuffer};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Result of loading a file: either usable samples or nothing at all.
#[derive(Debug, Clone)]
pub enum DecodeOutcome {
    Samples(AudioData),
    /// Zero-byte file or a stream that decoded to zero samples
    Empty,
}

/// Decode `path`, downmix to mono and bring it to `sample_rate`.
pub fn load_waveform<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<DecodeOutcome> {
    let path = path.as_ref();

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat audio file: {}", path.display()))?;
    if metadata.is_file() && metadata.len() == 0 {
        debug!(path = %path.display(), "zero-byte audio file");
        return Ok(DecodeOutcome::Empty);
    }

    let decoded = decode_audio(path)?;
    if decoded.samples.is_empty() {
        return Ok(DecodeOutcome::Empty);
    }

    let audio = resample_to(&decoded, sample_rate).with_context(|| {
        format!(
            "Failed to resample {} from {} Hz to {} Hz",
            path.display(),
            decoded.sample_rate,
            sample_rate
        )
    })?;
    Ok(DecodeOutcome::Samples(audio))
}

/// Decode an audio file to raw PCM samples (mono, f32) at its native rate
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path = path.as_ref();

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let format_result = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Failed to detect audio format")?;

    let mut format = format_result.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Sample rate not specified in audio file")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create decoder")?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err).context("Failed to read packet"),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => downmix_into(decoded, &mut samples),
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!(path = %path.display(), reason, "skipping corrupt packet");
            }
            Err(err) => return Err(err).context("Failed to decode audio packet"),
        }
    }

    Ok(AudioData {
        samples,
        sample_rate,
    })
}

/// Average all channels of `buffer` into `out`.
fn downmix_into(buffer: AudioBufferRef<'_>, out: &mut Vec<f32>) {
    let spec = *buffer.spec();
    let channels = spec.channels.count().max(1);
    let frames = buffer.frames();
    if frames == 0 {
        return;
    }

    let mut interleaved = SampleBuffer::<f32>::new(buffer.capacity() as u64, spec);
    interleaved.copy_interleaved_ref(buffer);

    let scale = 1.0 / channels as f32;
    out.reserve(frames);
    for frame in interleaved.samples().chunks_exact(channels).take(frames) {
        out.push(frame.iter().sum::<f32>() * scale);
    }
}
