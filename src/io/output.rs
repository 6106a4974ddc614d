use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::MergeError;
use crate::matcher::MatchOutcome;
use crate::models::Record;

/// Stand-in for the absent side of a pair in the diff report
pub const DIFF_PLACEHOLDER: &str = "[[[ None ]]]";

/// Width of the left column of the diff report
pub const DIFF_COLUMN_WIDTH: usize = 60;

/// File name of a merged session: `{period}{session, zero-padded to 3}-merged.json`,
/// taken from the first record
pub fn merged_filename(records: &[Record]) -> crate::error::Result<String> {
    let first = records.first().ok_or(MergeError::EmptyOutput)?;
    let period = first
        .electoral_period()
        .ok_or(MergeError::MissingOutputField {
            field: "electoralPeriod.number",
        })?;
    let session = first
        .session_number()
        .ok_or(MergeError::MissingOutputField {
            field: "session.number",
        })?;

    Ok(format!("{}{:0>3}-merged.json", period, session))
}

/// Write records as pretty-printed JSON, non-ASCII characters kept as is
pub fn write_records_json<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    serde_json::to_writer_pretty(writer, records).context("Failed to write JSON")?;
    Ok(())
}

/// Write merged records into `dir` under their session file name, creating `dir` if needed
pub fn write_merged_file(dir: &Path, records: &[Record]) -> Result<PathBuf> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    }

    let path = dir.join(merged_filename(records)?);
    let file =
        File::create(&path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    write_records_json(&mut writer, records)?;
    writer.flush()?;

    Ok(path)
}

/// Two-column view of a pairing: media key on the left, proceeding key on the right
pub struct DiffReport<'a> {
    outcome: &'a MatchOutcome,
}

impl<'a> DiffReport<'a> {
    pub fn new(outcome: &'a MatchOutcome) -> Self {
        Self { outcome }
    }

    /// `(media key, proceeding key)` per pair, placeholders for absent sides
    pub fn rows(&self) -> Vec<(&'a str, &'a str)> {
        let outcome: &'a MatchOutcome = self.outcome;
        let keys = &outcome.keys;
        outcome
            .pairs
            .iter()
            .map(|pair| {
                let media = pair
                    .media()
                    .and_then(|m| keys.media_key(m))
                    .unwrap_or(DIFF_PLACEHOLDER);
                let proceeding = pair
                    .proceeding()
                    .and_then(|p| keys.proceeding_key(p))
                    .unwrap_or(DIFF_PLACEHOLDER);
                (media, proceeding)
            })
            .collect()
    }

    /// Format the report, header line first
    pub fn format(&self) -> String {
        let mut output = format_row("Media", "Proceeding");
        for (media, proceeding) in self.rows() {
            output.push_str(&format_row(media, proceeding));
        }
        output
    }
}

fn format_row(left: &str, right: &str) -> String {
    format!("{:<width$} {}\n", left, right, width = DIFF_COLUMN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchPair;
    use crate::stages::KeyTable;
    use serde_json::json;

    fn record(period: serde_json::Value, session: serde_json::Value) -> Record {
        Record::from_value(json!({
            "electoralPeriod": {"number": period},
            "session": {"number": session}
        }))
        .unwrap()
    }

    #[test]
    fn test_merged_filename_pads_session() {
        let records = vec![record(json!(20), json!(7))];
        assert_eq!(merged_filename(&records).unwrap(), "20007-merged.json");

        let records = vec![record(json!("19"), json!("123"))];
        assert_eq!(merged_filename(&records).unwrap(), "19123-merged.json");
    }

    #[test]
    fn test_merged_filename_errors() {
        assert!(matches!(merged_filename(&[]), Err(MergeError::EmptyOutput)));

        let records = vec![Record::from_value(json!({"electoralPeriod": {"number": 20}})).unwrap()];
        assert!(matches!(
            merged_filename(&records),
            Err(MergeError::MissingOutputField {
                field: "session.number"
            })
        ));
    }

    #[test]
    fn test_write_records_json_keeps_umlauts() {
        let records = vec![Record::from_value(json!({"title": "Sitzungseröffnung"})).unwrap()];
        let mut buffer = Vec::new();
        write_records_json(&mut buffer, &records).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Sitzungseröffnung"));
        assert!(text.contains("\n  {"));
    }

    #[test]
    fn test_diff_report_columns() {
        let outcome = MatchOutcome {
            keys: KeyTable::new(
                vec!["p-a".to_string(), "p-b".to_string()],
                vec!["p-a".to_string(), "m-x".to_string()],
            ),
            pairs: vec![
                MatchPair::Matched {
                    proceeding: 0,
                    media: 0,
                },
                MatchPair::MediaOnly { media: 1 },
                MatchPair::ProceedingOnly { proceeding: 1 },
            ],
            exact_matches: 1,
            realigned: 0,
        };
        let report = DiffReport::new(&outcome);

        assert_eq!(
            report.rows(),
            vec![
                ("p-a", "p-a"),
                ("m-x", DIFF_PLACEHOLDER),
                (DIFF_PLACEHOLDER, "p-b"),
            ]
        );

        let text = report.format();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Media "));
        assert!(lines[0].ends_with(" Proceeding"));
        assert_eq!(lines[2], format!("{:<60} {}", "m-x", DIFF_PLACEHOLDER));
        assert_eq!(lines[3].find("p-b"), Some(DIFF_COLUMN_WIDTH + 1));
    }
}
