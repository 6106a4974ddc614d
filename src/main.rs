use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sessionmerge::{
    DiffReport, MatchConfig, Record, SourceKind, collect_stats, matching_items, merge_data,
    merge_directories, read_records_file, unmatched_count, write_merged_file, write_records_json,
};

#[derive(Parser)]
#[command(name = "sessionmerge")]
#[command(author, version, about = "Merge proceedings and media speech lists of a parliamentary session", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a proceedings file with a media file (or two directories of them)
    Merge {
        /// Proceedings file, or proceedings directory
        proceedings: PathBuf,

        /// Media file, or media directory
        media: PathBuf,

        /// Output directory; merged JSON goes to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable every option needed for a full update (includes all proceedings)
        #[arg(long)]
        complete: bool,

        #[command(flatten)]
        options: MatchArgs,
    },

    /// Show how media items and proceedings were paired
    Check {
        /// Proceedings file
        proceedings: PathBuf,

        /// Media file
        media: PathBuf,

        #[command(flatten)]
        options: MatchArgs,
    },

    /// Only display the number of unmatched items on each side
    UnmatchedCount {
        /// Proceedings file
        proceedings: PathBuf,

        /// Media file
        media: PathBuf,

        #[command(flatten)]
        options: MatchArgs,
    },

    /// Unmatched statistics over a data directory with media/ and proceedings/ subdirectories
    Stats {
        /// Data directory
        data_dir: PathBuf,

        #[command(flatten)]
        options: MatchArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct MatchArgs {
    /// Include all proceedings-issued speeches even if they did not have a match
    #[arg(long)]
    include_all_proceedings: bool,

    /// Realign non-matching subsequences using speaker names
    #[arg(long)]
    second_stage_matching: bool,

    /// Let realignment skip one proceedings item when the next one matches
    #[arg(long)]
    advanced_rematch: bool,

    /// Verbose output
    #[arg(short, long, visible_alias = "debug")]
    verbose: bool,
}

impl MatchArgs {
    fn to_config(&self) -> MatchConfig {
        MatchConfig {
            include_all_proceedings: self.include_all_proceedings,
            second_stage_matching: self.second_stage_matching,
            advanced_rematch: self.advanced_rematch,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            proceedings,
            media,
            output,
            complete,
            options,
        } => {
            setup_logging(options.verbose);
            let mut config = options.to_config();
            if complete {
                config.include_all_proceedings = true;
            }
            merge_command(&proceedings, &media, output.as_deref(), &config)
        }
        Commands::Check {
            proceedings,
            media,
            options,
        } => {
            setup_logging(options.verbose);
            check_command(&proceedings, &media, &options.to_config())
        }
        Commands::UnmatchedCount {
            proceedings,
            media,
            options,
        } => {
            setup_logging(options.verbose);
            unmatched_count_command(&proceedings, &media, &options.to_config())
        }
        Commands::Stats { data_dir, options } => {
            setup_logging(options.verbose);
            let report = collect_stats(&data_dir, &options.to_config())?;
            print!("{}", report.format());
            Ok(())
        }
    }
}

/// Logs go to stderr so that JSON written to stdout stays parseable
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_sources(
    proceedings: &Path,
    media: &Path,
) -> Result<(Vec<Record>, Vec<Record>)> {
    info!("Loading proceedings from {:?}", proceedings);
    let proceedings = read_records_file(proceedings, SourceKind::Proceedings)?;
    info!("Loading media from {:?}", media);
    let media = read_records_file(media, SourceKind::Media)?;
    Ok((proceedings, media))
}

fn merge_command(
    proceedings: &Path,
    media: &Path,
    output: Option<&Path>,
    config: &MatchConfig,
) -> Result<()> {
    if proceedings.is_dir() && media.is_dir() {
        let Some(output) = output else {
            bail!("--output is required when merging directories");
        };
        let written = merge_directories(proceedings, media, output, config)?;
        info!("Merged {} sessions into {:?}", written.len(), output);
        return Ok(());
    }

    let (proceedings, media) = load_sources(proceedings, media)?;
    let merged =
        merge_data(&proceedings, &media, config).context("Failed to merge session data")?;

    match output {
        Some(dir) => {
            let path = write_merged_file(dir, &merged)?;
            info!("{} merged records written to {:?}", merged.len(), path);
        }
        None => {
            let stdout = std::io::stdout();
            write_records_json(stdout.lock(), &merged)?;
            println!();
        }
    }

    Ok(())
}

fn check_command(proceedings: &Path, media: &Path, config: &MatchConfig) -> Result<()> {
    let (proceedings, media) = load_sources(proceedings, media)?;
    let outcome =
        matching_items(&proceedings, &media, config).context("Failed to match session data")?;
    print!("{}", DiffReport::new(&outcome).format());
    Ok(())
}

fn unmatched_count_command(proceedings: &Path, media: &Path, config: &MatchConfig) -> Result<()> {
    let (proceedings, media) = load_sources(proceedings, media)?;
    let count =
        unmatched_count(&proceedings, &media, config).context("Failed to match session data")?;
    println!("{}", serde_json::to_string_pretty(&count)?);
    Ok(())
}
