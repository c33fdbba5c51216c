//! Training manifest parsing and label id assignment.
//!
//! The manifest is a headerless tab-separated file with five positional
//! columns: file name, two unused fields, duration in seconds, label.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::types::ManifestEntry;

const FILE_COLUMN: usize = 0;
const DURATION_COLUMN: usize = 3;
const LABEL_COLUMN: usize = 4;
const COLUMN_COUNT: usize = 5;

/// Dense label ids, assigned by enumerating the sorted unique labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelIndex {
    ids: BTreeMap<String, u32>,
}

impl LabelIndex {
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unique: BTreeSet<&str> = labels.into_iter().collect();
        let ids = unique
            .into_iter()
            .enumerate()
            .map(|(id, label)| (label.to_string(), id as u32))
            .collect();
        Self { ids }
    }

    /// Build the index and return the id of every label, in input order.
    pub fn assign<'a, I>(labels: I) -> (Self, Vec<u32>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let labels: Vec<&str> = labels.into_iter().collect();
        let index = Self::from_labels(labels.iter().copied());
        let ids = labels.iter().map(|&label| index.ids[label]).collect();
        (index, ids)
    }

    pub fn id(&self, label: &str) -> Option<u32> {
        self.ids.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Labels in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ids.iter().map(|(label, &id)| (label.as_str(), id))
    }

    pub fn into_map(self) -> BTreeMap<String, u32> {
        self.ids
    }
}

/// Read every row of the manifest at `path`, in file order.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let manifest_error = |source| ExtractError::Manifest {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(manifest_error)?;

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result.map_err(manifest_error)?;
        let line = record.position().map_or(0, |pos| pos.line());

        if record.len() < COLUMN_COUNT {
            return Err(ExtractError::ManifestRow {
                line,
                reason: format!(
                    "expected {} tab-separated columns, found {}",
                    COLUMN_COUNT,
                    record.len()
                ),
            });
        }

        let file_name = &record[FILE_COLUMN];
        if file_name.is_empty() {
            return Err(ExtractError::ManifestRow {
                line,
                reason: "empty file name".to_string(),
            });
        }

        entries.push(ManifestEntry {
            file_name: file_name.to_string(),
            duration: record[DURATION_COLUMN].trim().parse::<f64>().ok(),
            label: record[LABEL_COLUMN].to_string(),
        });
    }
    Ok(entries)
}
