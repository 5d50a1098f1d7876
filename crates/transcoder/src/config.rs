//! Transcoder options and batch job configuration

use crate::error::{Result, TranscodeError};
use crate::logging::{parse_log_level, LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use telecodec_codec_core::AudioFormat;

/// Options shared by every transcode call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscoderOptions {
    /// Log a full result summary at `info` instead of `debug`
    #[serde(default)]
    pub verbose: bool,
}

impl TranscoderOptions {
    /// Create options with verbosity set
    pub fn verbose(verbose: bool) -> Self {
        Self { verbose }
    }
}

/// `[logging]` table of a batch config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    /// Level name (`trace`, `debug`, `info`, `warn`, `error`)
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines
    #[serde(default)]
    pub json: bool,
    /// Annotate events with source file and line
    #[serde(default)]
    pub source_location: bool,
    /// Log the elapsed time of every transcode call
    #[serde(default)]
    pub stage_timings: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            source_location: false,
            stage_timings: false,
        }
    }
}

impl LogSettings {
    /// Resolve into a [`LoggingConfig`]
    pub fn to_logging_config(&self) -> Result<LoggingConfig> {
        Ok(LoggingConfig {
            level: parse_log_level(&self.level)?,
            format: if self.json {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            source_location: self.source_location,
            stage_timings: self.stage_timings,
        })
    }
}

/// One input transcoded into several formats, loaded from TOML
///
/// ```toml
/// input = "input.wav"
/// output_dir = "out"
/// formats = ["ulaw", "alaw"]
///
/// [logging]
/// level = "debug"
/// stage_timings = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// WAV file to transcode
    pub input: PathBuf,
    /// Directory receiving `<stem>.<format>` outputs
    pub output_dir: PathBuf,
    /// Target formats, all of them when omitted
    #[serde(default = "all_formats")]
    pub formats: Vec<AudioFormat>,
    /// Verbose result logging
    #[serde(default)]
    pub verbose: bool,
    /// Logging settings
    #[serde(default)]
    pub logging: LogSettings,
}

fn all_formats() -> Vec<AudioFormat> {
    AudioFormat::all().to_vec()
}

impl BatchConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| TranscodeError::config(format!("invalid batch config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TranscodeError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Transcoder options implied by this config
    pub fn options(&self) -> TranscoderOptions {
        TranscoderOptions::verbose(self.verbose)
    }

    fn validate(&self) -> Result<()> {
        if self.formats.is_empty() {
            return Err(TranscodeError::config("formats must not be empty"));
        }
        parse_log_level(&self.logging.level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_minimal_config_defaults() {
        let config = BatchConfig::from_toml_str(
            r#"
            input = "input.wav"
            output_dir = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.input, PathBuf::from("input.wav"));
        assert_eq!(config.formats, AudioFormat::all().to_vec());
        assert!(!config.verbose);
        assert_eq!(config.logging, LogSettings::default());
        assert_eq!(config.options(), TranscoderOptions::default());
    }

    #[test]
    fn test_full_config() {
        let config = BatchConfig::from_toml_str(
            r#"
            input = "speech.wav"
            output_dir = "/tmp/out"
            formats = ["ulaw", "alaw"]
            verbose = true

            [logging]
            level = "debug"
            json = true
            source_location = true
            stage_timings = true
            "#,
        )
        .unwrap();

        assert_eq!(config.formats, vec![AudioFormat::ULaw, AudioFormat::ALaw]);
        assert!(config.options().verbose);

        let logging = config.logging.to_logging_config().unwrap();
        assert_eq!(logging.level, tracing::Level::DEBUG);
        assert_eq!(logging.format, LogFormat::Json);
        assert!(logging.source_location);
        assert!(logging.stage_timings);
    }

    #[test]
    fn test_unknown_format_is_config_error() {
        let err = BatchConfig::from_toml_str(
            r#"
            input = "a.wav"
            output_dir = "out"
            formats = ["mp3"]
            "#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_rejects_empty_formats_and_bad_level() {
        let err = BatchConfig::from_toml_str(
            "input = \"a.wav\"\noutput_dir = \"out\"\nformats = []\n",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = BatchConfig::from_toml_str(
            "input = \"a.wav\"\noutput_dir = \"out\"\n[logging]\nlevel = \"loud\"\n",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = BatchConfig::load("/nonexistent/job.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("/nonexistent/job.toml"));
    }
}
