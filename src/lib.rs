//! Log-mel spectrogram feature extraction for audio classification datasets.
//!
//! [`extract_log_mel_feats`] converts a `train` split (manifest driven,
//! silence segmented, labelled) or a `test` split (one record per file) into
//! a single [`archive::FeatureArchive`] on disk.

pub mod archive;
pub mod audio;
pub mod config;
pub mod error;
pub mod extractor;
pub mod features;
pub mod manifest;
pub mod progress;
pub mod types;

pub use config::{ExtractConfig, SilenceParams, SpectrogramParams};
pub use error::{ExtractError, Result};
pub use extractor::extract_log_mel_feats;
pub use manifest::LabelIndex;
pub use types::{FeatureRecord, SplitType};
