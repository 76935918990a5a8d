//! Command-line interface for dragsense.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dragsense - detects drags of eligible files out of the shell
#[derive(Parser, Debug)]
#[command(name = "dragsense")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Watch drags and print every detection (default)
    Watch {
        /// Print detections as JSON lines
        #[arg(long)]
        json: bool,

        /// Also write daily-rotated log files to this directory
        #[arg(long, value_name = "DIR")]
        log_dir: Option<PathBuf>,
    },

    /// Check once whether an eligible file is selected under a point
    Check {
        /// Screen x coordinate (current cursor if omitted)
        #[arg(long, requires = "y", allow_hyphen_values = true)]
        x: Option<i32>,

        /// Screen y coordinate (current cursor if omitted)
        #[arg(long, requires = "x", allow_hyphen_values = true)]
        y: Option<i32>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    /// Subcommand to run; `watch` when none was given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Watch {
            json: false,
            log_dir: None,
        })
    }
}
