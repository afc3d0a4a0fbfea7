use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CompareOverrides;

#[derive(Parser)]
#[command(
    name = "pixelsift",
    about = "Perceptual comparison of rendered frames"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare a candidate image against a baseline (exit 0/1)
    Compare {
        /// Baseline (expected) image path
        expected: PathBuf,
        /// Candidate (actual) image path
        actual: PathBuf,
        /// Write the diff visualization PNG here when pixels differ
        #[arg(long)]
        diff_output: Option<PathBuf>,
        /// Emit the result as JSON on stdout
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        overrides: CompareOverrides,
    },

    /// Compare every pair in a TOML manifest, in order (exit 0/1)
    Batch {
        /// Manifest with [[pair]] entries (name, expected, actual)
        manifest: PathBuf,
        /// Directory for per-pair diff visualization PNGs
        #[arg(long)]
        diff_dir: Option<PathBuf>,
        /// Emit results as a JSON array on stdout
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        overrides: CompareOverrides,
    },
}
