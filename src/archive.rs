//! On-disk feature archive.
//!
//! Layout: the 8-byte magic `MELPREP\0` followed by a bincode 1.x
//! (little-endian, fixed-width integers) encoding of [`FeatureArchive`].
//! Each record holds the file name, the feature matrix as ndarray's serde
//! form (`version: u8`, `dim: [rows, cols]`, row-major `data`) and an
//! optional `u32` label id.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SpectrogramParams;
use crate::error::{ExtractError, Result};
use crate::types::{FeatureRecord, SplitType};

pub const MAGIC: &[u8; 8] = b"MELPREP\0";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureArchive {
    pub format_version: u32,
    pub split: SplitType,
    pub spectrogram: SpectrogramParams,
    pub records: Vec<FeatureRecord>,
}

impl FeatureArchive {
    pub fn new(split: SplitType, spectrogram: SpectrogramParams, records: Vec<FeatureRecord>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            split,
            spectrogram,
            records,
        }
    }
}

/// Write `archive` to `path`, creating parent directories as needed.
pub fn write_archive(path: &Path, archive: &FeatureArchive) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| ExtractError::io(parent, err))?;
    }

    let file = File::create(path).map_err(|err| ExtractError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(MAGIC)
        .map_err(|err| ExtractError::io(path, err))?;
    bincode::serialize_into(&mut writer, archive)?;
    writer.flush().map_err(|err| ExtractError::io(path, err))?;
    Ok(())
}

pub fn read_archive(path: &Path) -> Result<FeatureArchive> {
    let file = File::open(path).map_err(|err| ExtractError::io(path, err))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 8];
    reader
        .read_exact(&mut magic)
        .map_err(|_| ExtractError::Archive("file too short for header".to_string()))?;
    if &magic != MAGIC {
        return Err(ExtractError::Archive("bad magic bytes".to_string()));
    }

    let archive: FeatureArchive = bincode::deserialize_from(&mut reader)?;
    if archive.format_version != FORMAT_VERSION {
        return Err(ExtractError::Archive(format!(
            "unsupported format version {} (expected {})",
            archive.format_version, FORMAT_VERSION
        )));
    }
    Ok(archive)
}
