use crate::models::Record;

use super::{KeyConfig, fold_text};

/// Cleaned speaker label of a record's first speaker.
///
/// Returns `None` when the record has no speakers. The label is folded
/// (lowercase, accents stripped) and the configured noise phrases removed.
pub fn speaker_cleanup(record: &Record, config: &KeyConfig) -> Option<String> {
    if record.people().is_empty() {
        return None;
    }
    let label = record.first_speaker_label().unwrap_or_default();
    Some(clean_label(label, config))
}

/// Fold a raw label and apply the replacement list
pub fn clean_label(label: &str, config: &KeyConfig) -> String {
    config
        .speaker_replacements
        .iter()
        .fold(fold_text(label), |speaker, (pattern, replacement)| {
            speaker.replace(pattern.as_str(), replacement)
        })
}
