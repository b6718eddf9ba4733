//! Binary crate for the `voiceweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging initialization from the logging config file
//! - The linear pipeline: config → geolocate → fetch weather → speak

use std::process::ExitCode;

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
