//! Command-line argument definitions for the Blockflow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity and which kind of output is rendered.

use std::time::Duration;

use clap::Parser;

/// Command-line arguments for the Blockflow diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the scene file (TOML with `[[node]]` and `[[edge]]` tables)
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to a configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Render the frame this many seconds after mount.
    /// Defaults to the moment every reveal has finished.
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds, conflicts_with = "animated")]
    pub at: Option<Duration>,

    /// Write a self-animating SVG instead of a single frame
    #[arg(long)]
    pub animated: bool,

    /// Write this many frames driven by a simulated clock
    #[arg(long, value_name = "N", conflicts_with_all = ["animated", "at"])]
    pub frames: Option<u32>,

    /// Frames per second of simulated time when writing frames
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Directory receiving `frame_0000.svg`, `frame_0001.svg`, ...
    #[arg(long, default_value = "frames")]
    pub frames_dir: String,
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|err| format!("`{value}` is not a number: {err}"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("`{value}` must be a finite, non-negative number of seconds"))
}
