//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sfs-results",
    version,
    author = "neur0map",
    about = "Parse reputation lookup responses into typed results",
    long_about = "sfs-results reads the JSON responses of a reputation lookup service (email, \
                  email hash, IP and username lookups), validates every record and prints the \
                  typed results as JSON."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/sfs-results/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a whole lookup response, dropping invalid records
    Batch {
        /// Response JSON file, or "-" for stdin
        input: PathBuf,

        /// Override the blacklist threshold in minutes
        #[arg(long, value_name = "MINUTES")]
        threshold: Option<u32>,

        /// Print drop statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Parse a single lookup record, failing on invalid input
    Record {
        /// Record JSON file, or "-" for stdin
        input: PathBuf,

        /// Type tag of the record
        #[arg(short = 't', long = "type", value_parser = ["email", "emailHash", "ip", "username"])]
        result_type: String,

        /// Identifier to use when the record has no "value" field
        #[arg(long)]
        value: Option<String>,

        /// Override the blacklist threshold in minutes
        #[arg(long, value_name = "MINUTES")]
        threshold: Option<u32>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
