//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// dayplanner - LLM-backed daily task planner
#[derive(Parser)]
#[command(
    name = "dp",
    about = "Turn a list of tasks into a daily schedule using a hosted LLM",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP relay
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Plan a day from tasks given on the command line
    Plan {
        /// Task descriptions
        #[arg(required = true, value_name = "TASK")]
        tasks: Vec<String>,

        /// Generate the schedule locally without calling a provider
        #[arg(short, long)]
        mock: bool,

        /// Attach an image URL to every entry
        #[arg(short, long)]
        images: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate an image for one task
    Image {
        /// Task description
        description: String,
    },

    /// Show the resolved configuration
    Config,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dayplanner")
        .join("logs")
        .join("dayplanner.log")
}

/// Output format for planning results
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!("OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use text or json", s))
            }
        }
    }
}
