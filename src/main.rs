//! pdf-buckets CLI
//!
//! Command-line front end for size-balanced PDF reorganization.
//!
//! # Commands
//!
//! - `plan` - Scan, bucket and write the journal without touching files
//! - `run` - Plan, then replay the journal
//! - `execute` - Replay an existing journal (resume after a crash)
//! - `audit` - Show how far a journal has been applied

mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_buckets::logging::{self, DEFAULT_LOG_DIR};
use pdf_buckets::{RunMode, TransferMode};
use std::path::PathBuf;

/// Reorganize PDF files into size-balanced buckets.
#[derive(Parser)]
#[command(name = "pdf-buckets")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory for run log files
    #[arg(global = true, long, env = "PDF_BUCKETS_LOG_DIR", default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for summaries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Options shared by `plan` and `run`
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Folder containing the PDF files to classify
    #[arg(short, long, env = "PDF_BUCKETS_SOURCE")]
    source: PathBuf,

    /// Folder the buckets are created under
    #[arg(short, long, env = "PDF_BUCKETS_TARGET")]
    target: PathBuf,

    /// Number of buckets to distribute files into
    #[arg(short, long, env = "PDF_BUCKETS_NUM_BUCKETS", default_value_t = pdf_buckets::config::DEFAULT_BUCKETS)]
    buckets: usize,

    /// Journal of planned moves
    #[arg(short, long, env = "PDF_BUCKETS_JOURNAL", default_value = pdf_buckets::wal::DEFAULT_JOURNAL)]
    journal: PathBuf,

    /// Case-sensitive suffix of files to pick up
    #[arg(long, env = "PDF_BUCKETS_SUFFIX", default_value = pdf_buckets::vfs::DEFAULT_SUFFIX)]
    suffix: String,

    /// Maximum files per shard folder
    #[arg(long, env = "PDF_BUCKETS_SHARD_SIZE", default_value_t = pdf_buckets::planner::DEFAULT_SHARD_SIZE)]
    shard_size: usize,

    /// Output format (text, json)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan and write the journal; no files are touched
    Plan(PlanArgs),

    /// Scan, write the journal, then move the files
    Run {
        #[command(flatten)]
        plan: PlanArgs,

        /// Copy instead of move
        #[arg(long)]
        copy: bool,
    },

    /// Replay an existing journal
    Execute {
        /// Journal to replay
        #[arg(short, long, env = "PDF_BUCKETS_JOURNAL", default_value = pdf_buckets::wal::DEFAULT_JOURNAL)]
        journal: PathBuf,

        /// Copy instead of move
        #[arg(long)]
        copy: bool,
    },

    /// Classify journal entries as pending, done, conflicting or missing
    Audit {
        /// Journal to inspect
        #[arg(short, long, env = "PDF_BUCKETS_JOURNAL", default_value = pdf_buckets::wal::DEFAULT_JOURNAL)]
        journal: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn transfer_mode(copy: bool) -> TransferMode {
    if copy {
        TransferMode::Copy
    } else {
        TransferMode::Move
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up PDF_BUCKETS_* defaults from a local .env before parsing
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_file = logging::init(&cli.log_dir, cli.verbose)?;
    tracing::info!(log_file = %log_file.display(), "pdf-buckets v{}", pdf_buckets::VERSION);

    let outcome = match cli.command {
        Commands::Plan(args) => commands::plan::run(args, RunMode::PlanOnly, TransferMode::Move),
        Commands::Run { plan, copy } => {
            commands::plan::run(plan, RunMode::PlanAndExecute, transfer_mode(copy))
        }
        Commands::Execute { journal, copy } => commands::execute::run(&journal, transfer_mode(copy)),
        Commands::Audit { journal, format } => commands::audit::run(&journal, format),
    };

    if let Err(err) = &outcome {
        tracing::error!(error = %err, "Run aborted; the journal is left in place");
    }
    outcome
}
