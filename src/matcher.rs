use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::keys::KeyConfig;
use crate::models::{MatchPair, Record};
use crate::stages::{
    KeyTable, Stage2Config, append_unmatched_proceedings, exact_match, execute_stage2,
    execute_stage3, index_records, segment_runs,
};

/// Options of a matching run
#[derive(Debug, Clone, Default)]
pub struct MatchConfig {
    /// Append proceedings that found no media counterpart after the media-ordered pairs
    pub include_all_proceedings: bool,
    /// Realign unmatched runs by speaker name
    pub second_stage_matching: bool,
    /// Let realignment skip one candidate proceeding
    pub advanced_rematch: bool,
    /// Noise phrases used when building identity keys
    pub key_config: KeyConfig,
}

/// Pairing of two sources together with the keys that produced it
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub keys: KeyTable,
    pub pairs: Vec<MatchPair>,
    /// Pairs matched by identical keys
    pub exact_matches: usize,
    /// Pairs recovered by speaker realignment
    pub realigned: usize,
}

impl MatchOutcome {
    /// Pairs with no media side
    pub fn unmatched_proceedings(&self) -> usize {
        self.pairs.iter().filter(|p| p.media().is_none()).count()
    }

    /// Pairs with no proceeding side
    pub fn unmatched_media(&self) -> usize {
        self.pairs.iter().filter(|p| p.proceeding().is_none()).count()
    }
}

/// Match proceedings against media items.
///
/// Indexes both sources, pairs them by exact key in media order, optionally
/// realigns the unmatched runs, and finally appends leftover proceedings when
/// `include_all_proceedings` is set. The input records are not modified.
pub fn matching_items(
    proceedings: &[Record],
    media: &[Record],
    config: &MatchConfig,
) -> Result<MatchOutcome> {
    let keys = index_records(proceedings, media, &config.key_config)?;

    let mut pairs = exact_match(&keys);
    let exact_matches = pairs.iter().filter(|p| p.is_matched()).count();

    let mut realigned = 0;
    if config.second_stage_matching {
        let runs = segment_runs(&pairs);
        let stage2_config = Stage2Config {
            advanced_rematch: config.advanced_rematch,
        };
        let result = execute_stage2(&runs, proceedings, media, &config.key_config, &stage2_config);
        realigned = result.recovered;
        pairs = result.pairs;
    }

    if config.include_all_proceedings {
        append_unmatched_proceedings(&mut pairs, proceedings.len());
    }

    info!(
        "Matched {} exactly and {} by speaker; {} pairs total",
        exact_matches,
        realigned,
        pairs.len()
    );

    Ok(MatchOutcome {
        keys,
        pairs,
        exact_matches,
        realigned,
    })
}

/// Match both sources and produce the merged record sequence
pub fn merge_data(
    proceedings: &[Record],
    media: &[Record],
    config: &MatchConfig,
) -> Result<Vec<Record>> {
    let outcome = matching_items(proceedings, media, config)?;
    Ok(execute_stage3(&outcome.pairs, proceedings, media))
}

/// Sizes of both sources and how many of their records found no counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnmatchedCount {
    pub proceedings: usize,
    pub media: usize,
    pub unmatched_proceedings: usize,
    pub unmatched_media: usize,
}

impl UnmatchedCount {
    /// Share of media items left unmatched, `None` for an empty media list
    pub fn unmatched_media_ratio(&self) -> Option<f64> {
        (self.media > 0).then(|| self.unmatched_media as f64 / self.media as f64)
    }
}

/// Count unmatched records on both sides.
///
/// Always runs with `include_all_proceedings` so leftover proceedings are counted.
pub fn unmatched_count(
    proceedings: &[Record],
    media: &[Record],
    config: &MatchConfig,
) -> Result<UnmatchedCount> {
    let config = MatchConfig {
        include_all_proceedings: true,
        ..config.clone()
    };
    let outcome = matching_items(proceedings, media, &config)?;

    Ok(UnmatchedCount {
        proceedings: proceedings.len(),
        media: media.len(),
        unmatched_proceedings: outcome.unmatched_proceedings(),
        unmatched_media: outcome.unmatched_media(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn speech(title: &str, speaker: &str) -> Record {
        Record::from_value(json!({
            "electoralPeriod": {"number": 20},
            "session": {"number": 3},
            "agendaItem": {"officialTitle": title},
            "people": [{"label": speaker}]
        }))
        .unwrap()
    }

    #[test]
    fn test_leftover_proceedings_only_with_flag() {
        let proceedings = vec![speech("TOP 1", "A"), speech("TOP 2", "B")];
        let media = vec![speech("TOP 1", "A")];

        let default = matching_items(&proceedings, &media, &MatchConfig::default()).unwrap();
        assert_eq!(default.pairs.len(), 1);
        assert_eq!(default.exact_matches, 1);

        let config = MatchConfig {
            include_all_proceedings: true,
            ..Default::default()
        };
        let all = matching_items(&proceedings, &media, &config).unwrap();
        assert_eq!(
            all.pairs,
            vec![
                MatchPair::Matched {
                    proceeding: 0,
                    media: 0
                },
                MatchPair::ProceedingOnly { proceeding: 1 },
            ]
        );
    }

    #[test]
    fn test_realigned_proceedings_not_appended_again() {
        let proceedings = vec![
            speech("TOP 1", "A"),
            speech("TOP 2 (alt)", "B"),
            speech("TOP 3", "C"),
        ];
        let media = vec![speech("TOP 1", "A"), speech("TOP 2", "B"), speech("TOP 3", "C")];
        let config = MatchConfig {
            include_all_proceedings: true,
            second_stage_matching: true,
            ..Default::default()
        };

        let outcome = matching_items(&proceedings, &media, &config).unwrap();
        assert_eq!(outcome.exact_matches, 2);
        assert_eq!(outcome.realigned, 1);
        assert_eq!(outcome.pairs.len(), 3);
        assert!(outcome.pairs.iter().all(MatchPair::is_matched));
    }

    #[test]
    fn test_unmatched_count_includes_leftover_proceedings() {
        let proceedings = vec![speech("TOP 1", "A"), speech("TOP 2", "B"), speech("TOP 3", "C")];
        let media = vec![speech("TOP 1", "A"), speech("TOP 9", "Z")];

        let count = unmatched_count(&proceedings, &media, &MatchConfig::default()).unwrap();
        assert_eq!(
            count,
            UnmatchedCount {
                proceedings: 3,
                media: 2,
                unmatched_proceedings: 2,
                unmatched_media: 1,
            }
        );
        assert_eq!(count.unmatched_media_ratio(), Some(0.5));
    }

    #[test]
    fn test_unmatched_count_serializes_snake_case() {
        let count = UnmatchedCount {
            proceedings: 1,
            media: 2,
            unmatched_proceedings: 3,
            unmatched_media: 4,
        };
        let value = serde_json::to_value(count).unwrap();
        assert_eq!(
            value,
            json!({
                "proceedings": 1,
                "media": 2,
                "unmatched_proceedings": 3,
                "unmatched_media": 4
            })
        );
    }

    #[test]
    fn test_empty_media_ratio() {
        let count = UnmatchedCount {
            proceedings: 4,
            media: 0,
            unmatched_proceedings: 4,
            unmatched_media: 0,
        };
        assert_eq!(count.unmatched_media_ratio(), None);
    }
}
