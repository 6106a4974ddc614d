use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Which of the two input collections a record comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// Records parsed from the official written proceedings
    Proceedings,
    /// Records parsed from the video/media index
    Media,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Proceedings => write!(f, "proceedings"),
            SourceKind::Media => write!(f, "media"),
        }
    }
}

/// Stable identifier of a record: its source and its position in that source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    pub source: SourceKind,
    pub index: usize,
}

impl RecordId {
    pub fn new(source: SourceKind, index: usize) -> Self {
        Self { source, index }
    }

    pub fn proceeding(index: usize) -> Self {
        Self::new(SourceKind::Proceedings, index)
    }

    pub fn media(index: usize) -> Self {
        Self::new(SourceKind::Media, index)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.source, self.index)
    }
}

/// One speech as produced by the parsers.
///
/// Only a handful of fields take part in matching; everything else
/// (`textContents`, `media`, `documents`, ...) is carried through untouched,
/// so the record is kept as a JSON object rather than a fixed struct.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a JSON value, returning `None` if it is not an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// Top-level field lookup
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Nested lookup through objects, e.g. `["agendaItem", "officialTitle"]`
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, segment| value.get(*segment))
    }

    /// `electoralPeriod.number`, rendered as text whether it was stored as a number or a string
    pub fn electoral_period(&self) -> Option<String> {
        self.get_path(&["electoralPeriod", "number"])
            .and_then(scalar_text)
    }

    /// `session.number`, rendered as text whether it was stored as a number or a string
    pub fn session_number(&self) -> Option<String> {
        self.get_path(&["session", "number"]).and_then(scalar_text)
    }

    pub fn official_title(&self) -> Option<&str> {
        self.get_path(&["agendaItem", "officialTitle"])
            .and_then(Value::as_str)
    }

    pub fn speech_index(&self) -> Option<i64> {
        self.get_path(&["agendaItem", "speechIndex"])
            .and_then(Value::as_i64)
    }

    /// Speaker entries; a missing `people` field reads as no speakers
    pub fn people(&self) -> &[Value] {
        self.get("people")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Label of the first speaker, if there is one
    pub fn first_speaker_label(&self) -> Option<&str> {
        self.people()
            .first()
            .and_then(|person| person.get("label"))
            .and_then(Value::as_str)
    }

    /// Whether the record carries a transcript body (proceedings do, media items don't)
    pub fn has_text_contents(&self) -> bool {
        self.get("textContents").is_some()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
