//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gesture Media Control - control media playback with hand gestures
#[derive(Parser, Debug)]
#[command(name = "gesture-media")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the camera and control media playback
    Run {
        /// Camera device index (overrides config)
        #[arg(long)]
        camera: Option<u32>,

        /// Detector executable (overrides config)
        #[arg(long)]
        detector: Option<String>,

        /// Log actions instead of pressing media keys
        #[arg(long)]
        dry_run: bool,
    },

    /// Feed a recorded landmark stream through the gesture pipeline
    Replay {
        /// Recorded landmark stream (one JSON frame per line)
        input: PathBuf,

        /// Log actions instead of pressing media keys
        #[arg(long)]
        dry_run: bool,
    },

    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
