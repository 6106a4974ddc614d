use std::io;

use thiserror::Error;

use crate::models::RecordId;

/// Errors raised by the matching core and its record loaders.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("record {record} is missing required field '{field}'")]
    MissingField {
        record: RecordId,
        field: &'static str,
    },
    #[error("record {record} is not a JSON object")]
    NotAnObject { record: RecordId },
    #[error("merged output has no records")]
    EmptyOutput,
    #[error("merged output is missing required field '{field}'")]
    MissingOutputField { field: &'static str },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MergeError>;
