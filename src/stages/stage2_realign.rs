use std::collections::HashSet;
use std::ops::Range;

use tracing::{Level, debug, info};

use crate::keys::{KeyConfig, speaker_cleanup};
use crate::models::{MatchPair, Record, Run, RunKind};

/// Configuration for Stage 2 realignment
#[derive(Debug, Clone, Default)]
pub struct Stage2Config {
    /// Allow skipping one candidate when the second one matches the speaker
    pub advanced_rematch: bool,
}

/// Result of Stage 2 realignment
#[derive(Debug)]
pub struct Stage2Result {
    /// Flattened pairing list, same length as the input
    pub pairs: Vec<MatchPair>,
    /// Media items paired with a proceeding by this stage
    pub recovered: usize,
    /// Candidates discarded by the skip heuristic
    pub skipped: usize,
}

/// Split a pairing list into maximal runs of equal `RunKind`.
///
/// Concatenating the runs yields the input unchanged, and adjacent runs
/// always differ in kind.
pub fn segment_runs(pairs: &[MatchPair]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();

    for pair in pairs {
        let kind = RunKind::of(pair);
        match runs.last_mut() {
            Some(run) if run.kind == kind => run.pairs.push(*pair),
            _ => runs.push(Run {
                kind,
                pairs: vec![*pair],
            }),
        }
    }

    runs
}

/// Candidate proceedings for one unmatched run, consumed front to back through a cursor
#[derive(Debug, Clone)]
pub struct CandidateWindow {
    candidates: Vec<usize>,
    cursor: usize,
}

impl CandidateWindow {
    pub fn new(candidates: Vec<usize>) -> Self {
        Self {
            candidates,
            cursor: 0,
        }
    }

    /// Candidates not consumed yet
    pub fn remaining(&self) -> &[usize] {
        &self.candidates[self.cursor..]
    }

    pub fn len(&self) -> usize {
        self.remaining().len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }

    /// Take the front candidate if it satisfies `matches`.
    ///
    /// With `allow_skip`, a failing front candidate is discarded together with
    /// the second one when the second satisfies `matches`. Returns the taken
    /// candidate and how many candidates were consumed.
    pub fn take_matching<F>(&mut self, matches: F, allow_skip: bool) -> Option<(usize, usize)>
    where
        F: Fn(usize) -> bool,
    {
        let first = self.candidates.get(self.cursor).copied()?;
        if matches(first) {
            self.cursor += 1;
            return Some((first, 1));
        }

        if allow_skip {
            if let Some(second) = self.candidates.get(self.cursor + 1).copied() {
                if matches(second) {
                    self.cursor += 2;
                    return Some((second, 2));
                }
            }
        }

        None
    }
}

/// Perform Stage 2: bounded realignment of unmatched runs
///
/// Each unmatched run is bounded by the proceedings of its neighbouring match
/// runs (the anchors): candidates are the proceedings strictly after the
/// previous anchor and before the next one, in proceedings order. Proceedings
/// already paired anywhere are never candidates. Media items of the run are
/// then paired greedily, left to right, with the front candidate when the
/// cleaned speaker labels are equal.
///
/// Match runs pass through unchanged and the number of pairs is preserved.
///
/// # Panics
///
/// If a run adjacent to an unmatched run is not a match run, which
/// `segment_runs` never produces.
pub fn execute_stage2(
    runs: &[Run],
    proceedings: &[Record],
    media: &[Record],
    key_config: &KeyConfig,
    config: &Stage2Config,
) -> Stage2Result {
    let proceeding_speakers: Vec<Option<String>> = proceedings
        .iter()
        .map(|r| speaker_cleanup(r, key_config))
        .collect();

    let mut claimed: HashSet<usize> = runs
        .iter()
        .flat_map(|run| run.pairs.iter().filter_map(MatchPair::proceeding))
        .collect();

    let mut pairs = Vec::with_capacity(runs.iter().map(Run::len).sum());
    let mut recovered = 0;
    let mut skipped = 0;

    for (i, run) in runs.iter().enumerate() {
        if run.kind == RunKind::Match {
            pairs.extend_from_slice(&run.pairs);
            continue;
        }

        let bounds = window_bounds(runs, i, proceedings.len());
        let mut window =
            CandidateWindow::new(bounds.filter(|p| !claimed.contains(p)).collect());

        if tracing::enabled!(Level::DEBUG) {
            log_window(run, &window, proceedings, media);
        }

        for pair in &run.pairs {
            let Some(media_index) = pair.media() else {
                pairs.push(*pair);
                continue;
            };
            let speaker = speaker_cleanup(&media[media_index], key_config);

            let taken = window.take_matching(
                |candidate| proceeding_speakers[candidate] == speaker,
                config.advanced_rematch,
            );

            let proceeding = taken.map(|(candidate, consumed)| {
                claimed.insert(candidate);
                recovered += 1;
                skipped += consumed - 1;
                candidate
            });

            pairs.push(MatchPair::for_media(proceeding, media_index));
        }
    }

    info!(
        "Stage 2: {} media items realigned by speaker, {} candidates skipped",
        recovered, skipped
    );

    Stage2Result {
        pairs,
        recovered,
        skipped,
    }
}

/// Proceedings index range bounding the unmatched run at `i`
fn window_bounds(runs: &[Run], i: usize, proceedings_count: usize) -> Range<usize> {
    let start = match i.checked_sub(1).map(|prev| &runs[prev]) {
        Some(previous) => {
            assert_eq!(
                previous.kind,
                RunKind::Match,
                "run before an unmatched run must be a match run"
            );
            previous.trailing_proceeding().map_or(0, |p| p + 1)
        }
        None => 0,
    };

    let end = match runs.get(i + 1) {
        Some(next) => {
            assert_eq!(
                next.kind,
                RunKind::Match,
                "run after an unmatched run must be a match run"
            );
            // An anchor lying before `start` is never reached: scan to the end
            match next.leading_proceeding() {
                Some(p) if p >= start => p,
                _ => proceedings_count,
            }
        }
        None => proceedings_count,
    };

    start..end
}

/// Dump the run next to its window, one speaker label per column
fn log_window(run: &Run, window: &CandidateWindow, proceedings: &[Record], media: &[Record]) {
    debug!(
        "--- {} / {} non matching items -----",
        window.len(),
        run.len()
    );
    for row in 0..run.len().max(window.len()) {
        let media_label = run
            .pairs
            .get(row)
            .and_then(MatchPair::media)
            .and_then(|m| media[m].first_speaker_label())
            .unwrap_or("None");
        let proceeding_label = window
            .remaining()
            .get(row)
            .map(|&p| candidate_label(&proceedings[p]))
            .unwrap_or_else(|| "None".to_string());
        debug!("{}\t{}", media_label, proceeding_label);
    }
}

/// Speaker of a candidate proceeding, prefixed with its `speechIndex` when present
fn candidate_label(proceeding: &Record) -> String {
    let label = proceeding.first_speaker_label().unwrap_or("None");
    match proceeding.speech_index() {
        Some(index) => format!("[{}] {}", index, label),
        None => label.to_string(),
    }
}
