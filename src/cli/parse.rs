//! CLI parse: clap types for wordsync. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// wordsync - moderation queue for a shared word list
#[derive(Parser)]
#[command(name = "wordsync")]
#[command(about = "Batch word list proposals and sync them to the remote list and n-gram index")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/ and the queue record live here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProposeKind {
    Add,
    Remove,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Queue a confirmed proposal
    Propose {
        /// Whether the word is added or removed
        #[arg(value_enum)]
        kind: ProposeKind,
        /// The word (surrounding whitespace is trimmed)
        word: String,
        /// Id of the user who proposed it
        #[arg(long)]
        contributor: String,
    },
    /// Show the pending queue
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Merge the queue into the remote word list and index
    Sync {
        /// Fetch and reconcile but write nothing
        #[arg(long)]
        dry_run: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the indexed n-grams of a word
    Ngrams {
        word: String,
    },
    /// Read JSON events from stdin, one per line, and reply on stdout
    Serve,
    /// Validate configuration
    Validate,
}
