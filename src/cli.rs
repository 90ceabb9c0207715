//! Command-line interface for wildmend
//!
//! Runs scripted scenarios headlessly against the restoration routine.

use clap::Parser;
use std::path::PathBuf;

/// Reactive support-routine decision engine
#[derive(Parser, Debug)]
#[command(name = "wildmend")]
#[command(about = "Run a scripted scenario through the restoration routine")]
#[command(version)]
pub struct Args {
    /// RON scenario file to run
    pub scenario: PathBuf,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub report: Option<PathBuf>,

    /// Stop after this many ticks, even if the scenario is longer
    #[arg(long, value_name = "N")]
    pub ticks: Option<usize>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
