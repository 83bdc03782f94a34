use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shadowtake")]
#[command(author, version, about = "Inspect Shadow motion capture takes")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the folder of the most recently recorded take
    Newest {
        /// Take root to search (defaults to the configured root)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Show the stream header and node table of a take
    Info {
        /// Take folder, a take name like 2019-06-26/0001, or "newest"
        #[arg(required = true)]
        take: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the named channels of a take and their columns
    Channels {
        /// Take folder, a take name like 2019-06-26/0001, or "newest"
        #[arg(required = true)]
        take: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one channel's samples, one frame per line
    Dump {
        /// Take folder, a take name like 2019-06-26/0001, or "newest"
        #[arg(required = true)]
        take: String,

        /// Node name
        #[arg(short, long)]
        node: String,

        /// Channel name within the node
        #[arg(short = 'C', long)]
        channel: String,

        /// First frame to print
        #[arg(long, default_value = "0")]
        start: usize,

        /// Number of frames to print (defaults to all remaining)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
