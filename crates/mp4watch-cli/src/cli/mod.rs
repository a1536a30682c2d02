//! CLI for mp4watch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use mp4watch_core::registry::TabId;

use commands::{run_classify, run_completions, run_parse_header, run_replay};

/// Top-level CLI for mp4watch.
#[derive(Debug, Parser)]
#[command(name = "mp4watch")]
#[command(
    about = "mp4watch: replay recorded tab traffic and report downloadable MP4s",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Replay a recorded event log and print per-tab resource status.
    Replay {
        /// Path to the JSON event log.
        path: PathBuf,

        /// Only print this tab.
        #[arg(long, value_name = "TAB")]
        tab: Option<TabId>,

        /// Print the raw reply as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Check whether a URL classifies as MP4-like.
    Classify {
        /// URL to test.
        url: String,
    },

    /// Parse a header value against the Range and Content-Range grammars.
    ParseHeader {
        /// Header value, e.g. "bytes 0-999/1000" or "bytes=0-".
        value: String,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        match cli.command {
            CliCommand::Replay { path, tab, json } => {
                let cfg = mp4watch_core::config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_replay(&cfg, &path, tab, json)
            }
            CliCommand::Classify { url } => run_classify(&url),
            CliCommand::ParseHeader { value } => run_parse_header(&value),
            CliCommand::Completions { shell } => run_completions(shell),
        }
    }
}
