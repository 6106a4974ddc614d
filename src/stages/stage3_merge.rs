use serde_json::{Map, Value};

use crate::models::{MatchPair, Record};

/// Top-level fields taken from the media item when merging
pub const MEDIA_FIELDS: [&str; 3] = ["dateStart", "dateEnd", "media"];

/// Merge a matched proceeding and media item into a new record.
///
/// The proceeding is the base: speakers, text body and documents stay as they
/// are. The human-readable agenda title, the start/end timestamps and the
/// media block come from the media item; any of them absent there ends up as
/// `null`.
pub fn merge_item(proceeding: &Record, media_item: &Record) -> Record {
    let mut output = proceeding.clone();

    let title = media_item
        .get_path(&["agendaItem", "title"])
        .cloned()
        .unwrap_or(Value::Null);
    let fields = output.fields_mut();
    match fields.get_mut("agendaItem") {
        Some(Value::Object(agenda_item)) => {
            agenda_item.insert("title".to_string(), title);
        }
        _ => {
            let mut agenda_item = Map::new();
            agenda_item.insert("title".to_string(), title);
            fields.insert("agendaItem".to_string(), Value::Object(agenda_item));
        }
    }

    for field in MEDIA_FIELDS {
        let value = media_item.get(field).cloned().unwrap_or(Value::Null);
        fields.insert(field.to_string(), value);
    }

    output
}

/// Output record for one pair: merged when both sides exist, otherwise a copy of the present side
pub fn resolve_pair(pair: &MatchPair, proceedings: &[Record], media: &[Record]) -> Record {
    match *pair {
        MatchPair::Matched {
            proceeding,
            media: media_index,
        } => merge_item(&proceedings[proceeding], &media[media_index]),
        MatchPair::MediaOnly { media: media_index } => media[media_index].clone(),
        MatchPair::ProceedingOnly { proceeding } => proceedings[proceeding].clone(),
    }
}

/// Perform Stage 3: build the merged sequence in pairing order
pub fn execute_stage3(pairs: &[MatchPair], proceedings: &[Record], media: &[Record]) -> Vec<Record> {
    pairs
        .iter()
        .map(|pair| resolve_pair(pair, proceedings, media))
        .collect()
}
