//! Main entry point for the telecodec CLI
//!
//! Converts 8kHz mono 16-bit WAV files into raw G.729, μ-law, A-law or SLIN.

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

mod cli;
mod commands;
mod report;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "❌ Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
