//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cartkit")]
#[command(about = "Inspect, personalize and launch Nintendo 64 ROMs", long_about = None)]
pub(crate) struct Cli {
    /// Directory containing ROM files (overrides the configured library)
    #[arg(long, global = true)]
    pub rom_dir: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Show header details for one or more ROM files
    Inspect {
        /// ROM files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List the ROMs in the library directory
    Browse,

    /// Write a personalized copy of a ROM next to the original
    Patch {
        /// ROM file to patch (left unmodified)
        file: PathBuf,

        /// Number of random byte anomalies to write
        #[arg(long)]
        anomalies: Option<u32>,

        /// Skip the timing byte
        #[arg(long)]
        no_timing: bool,

        /// Skip the tone shift
        #[arg(long)]
        no_tone_shift: bool,

        /// Seed for reproducible anomalies
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Load a ROM, run it in the emulator and clean up afterwards
    Launch {
        /// ROM file to run
        file: PathBuf,

        /// Look for the emulator window so it can be embedded
        #[arg(long)]
        embed: bool,

        /// Pass the high frame rate arguments to the emulator
        #[arg(long)]
        high_fps: bool,

        /// Run the unmodified ROM even for recognized titles
        #[arg(long)]
        no_personalize: bool,

        /// Emulator executable (overrides the configured one)
        #[arg(long)]
        emulator: Option<String>,
    },

    /// Manage cartkit settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum ConfigAction {
    /// Show current settings
    Show,

    /// Print the settings file path
    Path,

    /// Remember a ROM library directory
    SetRomDir {
        /// Directory containing ROM files
        dir: PathBuf,
    },

    /// Forget the configured ROM library directory
    ClearRomDir,
}

#[cfg(test)]
#[path = "tests/cli_types_tests.rs"]
mod tests;
