pub mod error;
pub mod io;
pub mod keys;
pub mod matcher;
pub mod models;
pub mod stages;

pub use error::{MergeError, Result};
pub use io::{
    DiffReport, StatsReport, collect_stats, merge_directories, merged_filename, read_records_file,
    write_merged_file, write_records_json,
};
pub use keys::{KeyConfig, item_key, normalize_key, speaker_cleanup, title_cleanup};
pub use matcher::{
    MatchConfig, MatchOutcome, UnmatchedCount, matching_items, merge_data, unmatched_count,
};
pub use models::{MatchPair, Record, RecordId, Run, RunKind, SourceKind};
pub use stages::{
    KeyTable, Stage2Config, exact_match, execute_stage2, execute_stage3, index_records,
    merge_item, segment_runs,
};
