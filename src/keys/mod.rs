pub mod speaker;
pub mod title;

pub use speaker::*;
pub use title::*;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;

use crate::error::{MergeError, Result};
use crate::models::{Record, RecordId};

/// Placeholder for the speaker part of a key when a record has no speakers
pub const NO_SPEAKER: &str = "none";

/// Configuration for identity key construction
#[derive(Debug, Clone)]
pub struct KeyConfig {
    /// Literal `(pattern, replacement)` pairs applied in order to folded speaker labels
    pub speaker_replacements: Vec<(String, String)>,
}

impl Default for KeyConfig {
    /// Noise phrases of Bundestag speaker labels
    fn default() -> Self {
        Self {
            speaker_replacements: vec![
                (" von der ".to_string(), " ".to_string()),
                ("altersprasident ".to_string(), "".to_string()),
            ],
        }
    }
}

/// Decompose (NFKD), lowercase and drop combining marks, so `Präsidentin` becomes `prasidentin`.
///
/// Lowercasing runs after the compatibility decomposition since `ℌ` or `㎒`
/// only decompose to uppercase letters. Lowercased output is decomposed once
/// more so the result is a fixed point.
pub fn fold_text(input: &str) -> String {
    input
        .nfkd()
        .flat_map(char::to_lowercase)
        .nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

/// Normalize an assembled key. Idempotent.
pub fn normalize_key(key: &str) -> String {
    fold_text(key)
}

/// Build the canonical identity key `"{period}-{session} {title} ({speaker})"` of a record.
///
/// `id` only serves error reporting.
pub fn item_key(record: &Record, id: RecordId, config: &KeyConfig) -> Result<String> {
    let period = record
        .electoral_period()
        .ok_or(MergeError::MissingField {
            record: id,
            field: "electoralPeriod.number",
        })?;
    let session = record.session_number().ok_or(MergeError::MissingField {
        record: id,
        field: "session.number",
    })?;
    let title = record.official_title().ok_or(MergeError::MissingField {
        record: id,
        field: "agendaItem.officialTitle",
    })?;

    let speaker = speaker_cleanup(record, config);
    let speaker = speaker.as_deref().unwrap_or(NO_SPEAKER);

    Ok(normalize_key(&format!(
        "{}-{} {} ({})",
        period,
        session,
        title_cleanup(title),
        speaker
    )))
}
