use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::Result;
use crate::keys::{KeyConfig, item_key};
use crate::models::{Record, RecordId, SourceKind};

/// Identity keys for both sources, kept beside the records rather than written into them.
///
/// Keys are unique within one source, never across sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTable {
    proceedings: Vec<String>,
    media: Vec<String>,
}

impl KeyTable {
    pub fn new(proceedings: Vec<String>, media: Vec<String>) -> Self {
        Self { proceedings, media }
    }

    /// Key of any record by its identifier
    pub fn key(&self, id: RecordId) -> Option<&str> {
        let keys = match id.source {
            SourceKind::Proceedings => &self.proceedings,
            SourceKind::Media => &self.media,
        };
        keys.get(id.index).map(String::as_str)
    }

    pub fn proceeding_key(&self, index: usize) -> Option<&str> {
        self.key(RecordId::proceeding(index))
    }

    pub fn media_key(&self, index: usize) -> Option<&str> {
        self.key(RecordId::media(index))
    }

    pub fn proceeding_keys(&self) -> &[String] {
        &self.proceedings
    }

    pub fn media_keys(&self) -> &[String] {
        &self.media
    }
}

/// Perform Stage 0: identity indexing
///
/// Computes the key of every record in both sources. Within a source, a key
/// already taken gets a ` #N` suffix (smallest free N), assigned in order of
/// appearance; source-specific ordering fields such as `speechIndex` are not
/// comparable between sources and are ignored.
pub fn index_records(
    proceedings: &[Record],
    media: &[Record],
    config: &KeyConfig,
) -> Result<KeyTable> {
    let proceedings_keys = index_source(proceedings, SourceKind::Proceedings, config)?;
    let media_keys = index_source(media, SourceKind::Media, config)?;

    info!(
        "Stage 0: indexed {} proceedings and {} media items",
        proceedings_keys.len(),
        media_keys.len()
    );

    Ok(KeyTable::new(proceedings_keys, media_keys))
}

/// Assign unique keys to the records of one source, in source order
pub fn index_source(
    records: &[Record],
    source: SourceKind,
    config: &KeyConfig,
) -> Result<Vec<String>> {
    let mut taken: HashSet<String> = HashSet::with_capacity(records.len());
    let mut keys = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let id = RecordId::new(source, index);
        let base = item_key(record, id, config)?;

        let key = if taken.contains(&base) {
            let unique = disambiguate(&base, &taken);
            warn!("Duplicate key for {}: {:?} renamed to {:?}", id, base, unique);
            unique
        } else {
            base
        };

        taken.insert(key.clone());
        keys.push(key);
    }

    Ok(keys)
}

/// First `"{base} #N"` (N = 1, 2, ...) not already taken
fn disambiguate(base: &str, taken: &HashSet<String>) -> String {
    (1..)
        .map(|n| format!("{} #{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
