use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::archive::{write_archive, FeatureArchive};
use crate::audio::decoder::{load_waveform, DecodeOutcome};
use crate::audio::silence::split_on_silence;
use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::features::LogMelExtractor;
use crate::manifest::{read_manifest, LabelIndex};
use crate::progress::Progress;
use crate::types::{AudioData, FeatureRecord, SplitType};

/// Extract log-mel features for one dataset split and write them to `out_path`.
///
/// `split` is matched case-insensitively against `train` and `test` before any
/// file is touched. The train split reads `manifest_path`, splits every file on
/// silence and emits one labelled record per segment at least `fft_size`
/// samples long; it returns the label index. The test split emits one
/// unlabelled record per entry of `audio_dir` and returns `None`.
///
/// Both splits frame the STFT with the configured `hop_length`, so train and
/// test matrices share one time resolution.
pub fn extract_log_mel_feats(
    split: &str,
    manifest_path: Option<&Path>,
    audio_dir: &Path,
    out_path: &Path,
    config: &ExtractConfig,
    progress: &mut dyn Progress,
) -> Result<Option<LabelIndex>> {
    let split: SplitType = split.parse()?;
    config.validate()?;

    let extractor = LogMelExtractor::new(config.spectrogram);
    let (records, labels) = match split {
        SplitType::Train => {
            let manifest = manifest_path.ok_or(ExtractError::MissingManifest)?;
            let (records, labels) = extract_train(manifest, audio_dir, config, &extractor, progress)?;
            (records, Some(labels))
        }
        SplitType::Test => (extract_test(audio_dir, config, &extractor, progress)?, None),
    };

    progress.finished(records.len());
    let archive = FeatureArchive::new(split, config.spectrogram, records);
    write_archive(out_path, &archive)?;
    info!(
        output = %out_path.display(),
        records = archive.records.len(),
        "wrote feature archive"
    );
    Ok(labels)
}

fn extract_train(
    manifest_path: &Path,
    audio_dir: &Path,
    config: &ExtractConfig,
    extractor: &LogMelExtractor,
    progress: &mut dyn Progress,
) -> Result<(Vec<FeatureRecord>, LabelIndex)> {
    let entries = read_manifest(manifest_path)?;
    let (labels, label_ids) =
        LabelIndex::assign(entries.iter().map(|entry| entry.label.as_str()));
    info!(
        files = entries.len(),
        labels = labels.len(),
        "parsed training manifest"
    );
    progress.started(SplitType::Train, entries.len());

    let fft_size = config.spectrogram.fft_size;
    let mut records = Vec::new();
    for (index, (entry, &label_id)) in entries.iter().zip(&label_ids).enumerate() {
        let path = audio_dir.join(&entry.file_name);

        let audio = match load_waveform(&path, config.spectrogram.sample_rate)
            .map_err(|err| ExtractError::decode(&path, err))?
        {
            DecodeOutcome::Samples(audio) => audio,
            DecodeOutcome::Empty => {
                debug!(file = %entry.file_name, "empty waveform; no segments");
                progress.file_done(index, &entry.file_name, 0);
                continue;
            }
        };

        let before = records.len();
        for segment in split_on_silence(&audio.samples, &config.silence) {
            if !long_enough(segment.len(), fft_size) {
                debug!(
                    file = %entry.file_name,
                    start = segment.start,
                    end = segment.end,
                    "skipping segment shorter than fft window"
                );
                continue;
            }
            let feature = extractor
                .extract(&audio.samples[segment])
                .map_err(|err| spectrogram_error(&entry.file_name, err))?;
            records.push(FeatureRecord {
                file_name: entry.file_name.clone(),
                feature,
                label_id: Some(label_id),
            });
        }
        progress.file_done(index, &entry.file_name, records.len() - before);
    }

    Ok((records, labels))
}

fn extract_test(
    audio_dir: &Path,
    config: &ExtractConfig,
    extractor: &LogMelExtractor,
    progress: &mut dyn Progress,
) -> Result<Vec<FeatureRecord>> {
    let entries = list_entries(audio_dir)?;
    progress.started(SplitType::Test, entries.len());

    let sample_rate = config.spectrogram.sample_rate;
    let mut records = Vec::with_capacity(entries.len());
    for (index, (file_name, path)) in entries.iter().enumerate() {
        let outcome = match load_waveform(path, sample_rate) {
            Ok(outcome) => outcome,
            Err(err) if config.substitute_unreadable => {
                warn!(file = %file_name, error = %format!("{err:#}"), "unreadable file; using silence");
                DecodeOutcome::Empty
            }
            Err(err) => return Err(ExtractError::decode(path, err)),
        };

        let audio = match outcome {
            DecodeOutcome::Samples(audio) => audio,
            DecodeOutcome::Empty => {
                debug!(file = %file_name, "empty file");
                AudioData::silence(config.empty_fill_seconds, sample_rate)
            }
        };

        let feature = extractor
            .extract(&audio.samples)
            .map_err(|err| spectrogram_error(file_name, err))?;
        records.push(FeatureRecord {
            file_name: file_name.clone(),
            feature,
            label_id: None,
        });
        progress.file_done(index, file_name, 1);
    }

    Ok(records)
}

/// Segments strictly shorter than one FFT window carry no full frame.
fn long_enough(segment_len: usize, fft_size: usize) -> bool {
    segment_len >= fft_size
}

/// Every directory entry, sorted by name.
fn list_entries(audio_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let listing = fs::read_dir(audio_dir).map_err(|err| ExtractError::io(audio_dir, err))?;
    let mut entries = Vec::new();
    for entry in listing {
        let entry = entry.map_err(|err| ExtractError::io(audio_dir, err))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        entries.push((file_name, entry.path()));
    }
    entries.sort();
    Ok(entries)
}

fn spectrogram_error(file_name: &str, err: anyhow::Error) -> ExtractError {
    ExtractError::Spectrogram {
        file_name: file_name.to_string(),
        source: err.into(),
    }
}
