use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::MergeError;
use crate::models::{Record, RecordId, SourceKind};

/// Read a JSON array of records from a file
pub fn read_records_file(path: &Path, source: SourceKind) -> Result<Vec<Record>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_records_json(&content, source)
        .with_context(|| format!("Failed to parse {} file: {:?}", source, path))
}

/// Parse a JSON array of records; every element must be an object
pub fn parse_records_json(json: &str, source: SourceKind) -> crate::error::Result<Vec<Record>> {
    let values: Vec<Value> = serde_json::from_str(json)?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Record::from_value(value).ok_or(MergeError::NotAnObject {
                record: RecordId::new(source, index),
            })
        })
        .collect()
}

/// A media file of a data directory and its proceedings counterpart, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFiles {
    /// Session identifier: the first five characters of the media file name
    pub session: String,
    pub media: PathBuf,
    /// `{session}-data.json` in the proceedings directory, when it exists
    pub proceedings: Option<PathBuf>,
}

/// List `*.json` media files whose name starts with `prefix`, sorted by name,
/// with their proceedings counterpart
pub fn session_files(
    proceedings_dir: &Path,
    media_dir: &Path,
    prefix: &str,
) -> Result<Vec<SessionFiles>> {
    let entries = std::fs::read_dir(media_dir)
        .with_context(|| format!("Failed to read directory: {:?}", media_dir))?;

    let mut media_files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let matches_prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(prefix));
        if is_json && matches_prefix && path.is_file() {
            media_files.push(path);
        }
    }
    media_files.sort();

    Ok(media_files
        .into_iter()
        .map(|media| {
            let session: String = media
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .chars()
                .take(5)
                .collect();
            let candidate = proceedings_dir.join(format!("{}-data.json", session));
            SessionFiles {
                proceedings: candidate.is_file().then_some(candidate),
                session,
                media,
            }
        })
        .collect())
}
