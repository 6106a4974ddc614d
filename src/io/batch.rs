use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::matcher::{MatchConfig, UnmatchedCount, merge_data, unmatched_count};
use crate::models::{Record, SourceKind};

use super::{read_records_file, session_files, write_merged_file};

/// Merge every media file of `media_dir` that has a proceedings counterpart,
/// writing one merged file per session into `output_dir`.
///
/// Sessions whose files cannot be read or merged are logged and skipped.
pub fn merge_directories(
    proceedings_dir: &Path,
    media_dir: &Path,
    output_dir: &Path,
    config: &MatchConfig,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for files in session_files(proceedings_dir, media_dir, "")? {
        let Some(proceedings_path) = &files.proceedings else {
            warn!("No proceedings for session {} ({:?})", files.session, files.media);
            continue;
        };

        let merged = match merge_session(proceedings_path, &files.media, config) {
            Ok(merged) => merged,
            Err(e) => {
                warn!("Skipping session {}: {:#}", files.session, e);
                continue;
            }
        };

        if merged.is_empty() {
            warn!("Session {} produced no records", files.session);
            continue;
        }

        let path = write_merged_file(output_dir, &merged)?;
        info!("Session {}: {} records written to {:?}", files.session, merged.len(), path);
        written.push(path);
    }

    Ok(written)
}

fn merge_session(
    proceedings_path: &Path,
    media_path: &Path,
    config: &MatchConfig,
) -> Result<Vec<Record>> {
    let proceedings = read_records_file(proceedings_path, SourceKind::Proceedings)?;
    let media = read_records_file(media_path, SourceKind::Media)?;
    merge_data(&proceedings, &media, config).context("Failed to merge session data")
}

/// Unmatched counts for one session, `None` when its proceedings file is missing
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub session: String,
    pub counts: Option<UnmatchedCount>,
}

/// Mean and median share of unmatched media items over all sessions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSummary {
    pub mean_ratio: f64,
    pub median_ratio: f64,
}

#[derive(Debug, Clone, Default)]
pub struct StatsReport {
    pub sessions: Vec<SessionStats>,
}

impl StatsReport {
    /// Unmatched media ratio of every session that has counts and a non-empty media list
    pub fn ratios(&self) -> Vec<f64> {
        self.sessions
            .iter()
            .filter_map(|s| s.counts.as_ref())
            .filter_map(UnmatchedCount::unmatched_media_ratio)
            .collect()
    }

    pub fn summary(&self) -> Option<StatsSummary> {
        let mut ratios = self.ratios();
        if ratios.is_empty() {
            return None;
        }
        ratios.sort_by(|a, b| a.total_cmp(b));

        let mean_ratio = ratios.iter().sum::<f64>() / ratios.len() as f64;
        let mid = ratios.len() / 2;
        let median_ratio = if ratios.len() % 2 == 0 {
            (ratios[mid - 1] + ratios[mid]) / 2.0
        } else {
            ratios[mid]
        };

        Some(StatsSummary {
            mean_ratio,
            median_ratio,
        })
    }

    /// Tab-separated table followed by the summary lines
    pub fn format(&self) -> String {
        let mut output = String::from(
            "Session\tProc size\tMedia size\tUnmatched proceedings\tUnmatched media\tUnmatched media relative\n",
        );

        for session in &self.sessions {
            match &session.counts {
                Some(counts) => {
                    let ratio = counts
                        .unmatched_media_ratio()
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    output.push_str(&format!(
                        "{}\t{}\t{}\t{}\t{}\t{}\n",
                        session.session,
                        counts.proceedings,
                        counts.media,
                        counts.unmatched_proceedings,
                        counts.unmatched_media,
                        ratio
                    ));
                }
                None => output.push_str(&format!("{}\tUNMATCHED\n", session.session)),
            }
        }

        if let Some(summary) = self.summary() {
            output.push_str(&format!(
                "Average unmatched media ratio: {}\nMedian unmatched media ratio: {}\n",
                summary.mean_ratio, summary.median_ratio
            ));
        }

        output
    }
}

/// Count unmatched items for every `1*.json` media file under `data_dir/media`
/// against `data_dir/proceedings/{session}-data.json`
pub fn collect_stats(data_dir: &Path, config: &MatchConfig) -> Result<StatsReport> {
    let proceedings_dir = data_dir.join("proceedings");
    let media_dir = data_dir.join("media");

    let mut sessions = Vec::new();
    for files in session_files(&proceedings_dir, &media_dir, "1")? {
        let counts = match &files.proceedings {
            Some(proceedings_path) => {
                let proceedings = read_records_file(proceedings_path, SourceKind::Proceedings)?;
                let media = read_records_file(&files.media, SourceKind::Media)?;
                Some(
                    unmatched_count(&proceedings, &media, config)
                        .with_context(|| format!("Failed to match session {}", files.session))?,
                )
            }
            None => None,
        };
        sessions.push(SessionStats {
            session: files.session,
            counts,
        });
    }

    Ok(StatsReport { sessions })
}
