//! CLI interface for murmur

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Mood-driven ambient tone synthesis
#[derive(Parser)]
#[command(name = "murmur")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults are used if it does not exist)
    #[arg(short, long, global = true, default_value = "murmur.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which preset to play
#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
pub struct PresetChoice {
    /// Preset id (focus, creative, calm, nature, ...)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Page section to pick a preset for
    #[arg(short, long)]
    pub section: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a preset on the output device until Ctrl-C
    Play {
        #[command(flatten)]
        choice: PresetChoice,

        /// Stop after this many seconds
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Render a preset to a WAV file
    Record {
        #[command(flatten)]
        choice: PresetChoice,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "60")]
        duration: u64,
    },

    /// List presets and section routes
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest a preset for a page section
    Suggest {
        /// Section name, e.g. "projects" or "#about"
        section: String,

        /// Currently selected preset id
        #[arg(long)]
        current: Option<String>,
    },

    /// List available audio output devices
    Devices,

    /// Validate the configuration file
    Check,

    /// Generate an example configuration file
    Init,
}
