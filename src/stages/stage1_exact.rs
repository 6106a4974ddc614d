use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::models::MatchPair;

use super::KeyTable;

/// Perform Stage 1: exact key matching
///
/// Produces one pair per media item, in media order, paired with the
/// proceeding carrying the identical key if there is one. The media order is
/// authoritative for the resulting sequence.
pub fn exact_match(keys: &KeyTable) -> Vec<MatchPair> {
    let by_key: HashMap<&str, usize> = keys
        .proceeding_keys()
        .iter()
        .enumerate()
        .map(|(index, key)| (key.as_str(), index))
        .collect();

    let pairs: Vec<MatchPair> = keys
        .media_keys()
        .iter()
        .enumerate()
        .map(|(media, key)| MatchPair::for_media(by_key.get(key.as_str()).copied(), media))
        .collect();

    info!(
        "Stage 1: {} of {} media items matched by key",
        pairs.iter().filter(|p| p.is_matched()).count(),
        pairs.len()
    );

    pairs
}

/// Append a proceeding-only pair for every proceeding not already used, in proceedings order
pub fn append_unmatched_proceedings(pairs: &mut Vec<MatchPair>, proceedings_count: usize) {
    let used: HashSet<usize> = pairs.iter().filter_map(MatchPair::proceeding).collect();

    pairs.extend(
        (0..proceedings_count)
            .filter(|index| !used.contains(index))
            .map(|proceeding| MatchPair::ProceedingOnly { proceeding }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(proceedings: &[&str], media: &[&str]) -> KeyTable {
        KeyTable::new(
            proceedings.iter().map(|k| k.to_string()).collect(),
            media.iter().map(|k| k.to_string()).collect(),
        )
    }

    #[test]
    fn test_all_keys_match() {
        let keys = table(&["a", "b", "c"], &["a", "b", "c"]);
        let pairs = exact_match(&keys);

        assert_eq!(pairs.len(), 3);
        for (i, pair) in pairs.iter().enumerate() {
            assert_eq!(
                *pair,
                MatchPair::Matched {
                    proceeding: i,
                    media: i
                }
            );
        }
    }

    #[test]
    fn test_media_order_is_authoritative() {
        let keys = table(&["a", "b", "c"], &["c", "x", "a"]);
        let pairs = exact_match(&keys);

        assert_eq!(
            pairs,
            vec![
                MatchPair::Matched {
                    proceeding: 2,
                    media: 0
                },
                MatchPair::MediaOnly { media: 1 },
                MatchPair::Matched {
                    proceeding: 0,
                    media: 2
                },
            ]
        );
    }

    #[test]
    fn test_every_media_item_appears_once() {
        let keys = table(&["a", "b"], &["b", "q", "r", "a", "s"]);
        let pairs = exact_match(&keys);

        let media: Vec<usize> = pairs.iter().filter_map(MatchPair::media).collect();
        assert_eq!(media, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_append_unmatched_proceedings() {
        let keys = table(&["a", "b", "c", "d"], &["c", "x"]);
        let mut pairs = exact_match(&keys);
        append_unmatched_proceedings(&mut pairs, 4);

        assert_eq!(pairs.len(), 5);
        assert_eq!(
            &pairs[2..],
            &[
                MatchPair::ProceedingOnly { proceeding: 0 },
                MatchPair::ProceedingOnly { proceeding: 1 },
                MatchPair::ProceedingOnly { proceeding: 3 },
            ]
        );
    }
}
