//! Command-line definition and dispatch

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use telecodec_transcoder::{
    log_startup, parse_log_level, setup_logging, AudioFormat, BatchConfig, LogFormat,
    LoggingConfig, Transcoder, TranscoderOptions,
};

use crate::commands;

/// Transcode WAV audio into telephony codec formats
#[derive(Parser, Debug)]
#[command(name = "telecodec", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    /// Print results as JSON and emit JSON logs
    #[arg(long, global = true)]
    pub json: bool,

    /// Log a detailed summary of every conversion
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Logger overrides, applied on top of any `[logging]` config table
#[derive(Args, Debug, Default)]
pub struct LogArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "TELECODEC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Annotate log lines with source file and line
    #[arg(long, global = true)]
    pub log_source: bool,

    /// Log the elapsed time of each conversion
    #[arg(long, global = true)]
    pub log_timings: bool,
}

impl LogArgs {
    /// Merge these flags into `logging`
    ///
    /// Flags only switch options on. A config that enables one keeps it.
    pub fn apply(&self, mut logging: LoggingConfig, json: bool) -> Result<LoggingConfig> {
        if let Some(level) = &self.log_level {
            logging.level = parse_log_level(level)?;
        }
        if json {
            logging.format = LogFormat::Json;
        }
        logging.source_location |= self.log_source;
        logging.stage_timings |= self.log_timings;
        Ok(logging)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one WAV file to one format
    Convert {
        /// Input WAV file (8kHz, mono, 16-bit PCM)
        input: PathBuf,

        /// Output file, or `-` for stdout
        output: PathBuf,

        /// Target format (g729, ulaw, alaw, slin)
        #[arg(short, long)]
        format: String,
    },

    /// Convert one WAV file to several formats
    Batch {
        /// Input WAV file
        #[arg(required_unless_present = "config")]
        input: Option<PathBuf>,

        /// Directory receiving `<stem>.<format>` files
        #[arg(short, long, required_unless_present = "config")]
        output_dir: Option<PathBuf>,

        /// Comma-separated target formats (default: all)
        #[arg(long, value_delimiter = ',')]
        formats: Vec<String>,

        /// Read the job from a TOML file instead
        #[arg(short, long, conflicts_with_all = ["input", "output_dir", "formats"])]
        config: Option<PathBuf>,
    },

    /// Validate a WAV file and show its properties
    Info {
        /// Input WAV file
        input: PathBuf,
    },

    /// List output formats and their availability
    Formats,
}

impl Cli {
    /// Run the selected command
    pub fn execute(self) -> Result<ExitCode> {
        let Cli {
            log,
            json,
            verbose,
            command,
        } = self;

        match command {
            Commands::Convert {
                input,
                output,
                format,
            } => {
                setup_logging(&log.apply(default_logging(verbose), json)?);
                let transcoder = Transcoder::new(TranscoderOptions::verbose(verbose));
                commands::convert::execute(&transcoder, &input, &output, &format, json)?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Batch {
                input,
                output_dir,
                formats,
                config,
            } => {
                let (input, output_dir, formats, logging, verbose) = match config {
                    Some(path) => {
                        let config = BatchConfig::load(&path)?;
                        let logging = config.logging.to_logging_config()?;
                        let verbose = config.verbose || verbose;
                        (config.input, config.output_dir, config.formats, logging, verbose)
                    }
                    None => {
                        let (Some(input), Some(output_dir)) = (input, output_dir) else {
                            bail!("batch needs an input file and --output-dir, or --config");
                        };
                        let formats = parse_formats(&formats)?;
                        (input, output_dir, formats, default_logging(verbose), verbose)
                    }
                };

                setup_logging(&log.apply(logging, json)?);
                log_startup("batch");

                let transcoder = Transcoder::new(TranscoderOptions::verbose(verbose));
                commands::batch::execute(&transcoder, &input, &output_dir, &formats, json)
            }
            Commands::Info { input } => {
                setup_logging(&log.apply(default_logging(verbose), json)?);
                let transcoder = Transcoder::new(TranscoderOptions::verbose(verbose));
                commands::info::execute(&transcoder, &input, json)?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Formats => {
                setup_logging(&log.apply(default_logging(verbose), json)?);
                commands::formats::execute(&Transcoder::default(), json)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Logs stay quiet unless asked for, stdout is for results
fn default_logging(verbose: bool) -> LoggingConfig {
    let level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    LoggingConfig::at_level(level)
}

fn parse_formats(names: &[String]) -> Result<Vec<AudioFormat>> {
    if names.is_empty() {
        return Ok(AudioFormat::all().to_vec());
    }
    names
        .iter()
        .map(|name| {
            Transcoder::parse_format(name.trim())
                .with_context(|| format!("unknown format '{}'", name))
        })
        .collect()
}
