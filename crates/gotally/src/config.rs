//! Configuration for the gotally CLI
//!
//! All options can be given as flags; the ones that are typically fixed per
//! CI job can also come from `GOTALLY_*` environment variables.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use gotally_stream::{DEFAULT_BUFFER_CAPACITY, DecoderOptions, Palette};

use crate::ci;

/// Summarize `go test -json` output per package
///
/// Reads the test event stream from stdin (or a file), prints each package's
/// colorized output followed by its pass/fail/skip counts, and exits non-zero
/// if any test failed.
///
/// Example:
///   go test -json ./... | gotally --json-out test.out.json
#[derive(Parser, Debug, Clone)]
#[command(name = "gotally")]
#[command(version, about, long_about)]
pub struct Config {
    /// File with `go test -json` output
    ///
    /// Reads stdin when omitted or `-`.
    pub input: Option<PathBuf>,

    /// Also write the raw event stream to this file
    ///
    /// The file is created or truncated. Every byte read is written, even if
    /// decoding fails part way.
    #[arg(long, env = "GOTALLY_JSON_OUT")]
    pub json_out: Option<PathBuf>,

    /// When to color the report
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, env = "GOTALLY_COLOR")]
    pub color: ColorChoice,

    /// Reject event lines longer than this many bytes
    ///
    /// By default a single line may grow without limit.
    #[arg(long, env = "GOTALLY_MAX_LINE_LENGTH")]
    pub max_line_length: Option<usize>,

    /// Initial line buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY)]
    pub buffer_size: usize,

    /// Enable verbose logging (debug level)
    ///
    /// Logs go to stderr and never mix with the report on stdout.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            json_out: None,
            color: ColorChoice::Auto,
            max_line_length: None,
            buffer_size: DEFAULT_BUFFER_CAPACITY,
            verbose: false,
            quiet: false,
        }
    }
}

/// Whether to color output
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a color terminal or a CI log known to render it,
    /// unless `NO_COLOR` is set
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorChoice {
    /// Decide for stdout in the current process environment
    #[must_use]
    pub fn should_colorize(self) -> bool {
        self.resolve(
            || supports_color::on_cached(supports_color::Stream::Stdout).is_some(),
            |key| std::env::var_os(key),
        )
    }

    /// Decide given a terminal probe and an environment lookup
    pub fn resolve(
        self,
        terminal_supports_color: impl FnOnce() -> bool,
        lookup: impl Fn(&str) -> Option<std::ffi::OsString>,
    ) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                if ci::no_color_with(&lookup) {
                    false
                } else {
                    ci::force_color_with(&lookup) || terminal_supports_color()
                }
            }
        }
    }
}

impl Config {
    /// The input file, or `None` for stdin
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| *path != Path::new("-"))
    }

    /// Decoder tuning from the command line
    #[must_use]
    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            buffer_capacity: self.buffer_size,
            max_line_length: self.max_line_length,
        }
    }

    /// Palette for the report
    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::new(self.color.should_colorize())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `--buffer-size` or `--max-line-length` is zero
    /// - The input file does not exist
    /// - `--json-out` points at a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::ZeroBufferSize);
        }
        if self.max_line_length == Some(0) {
            return Err(ConfigError::ZeroMaxLineLength);
        }
        if let Some(input) = self.input_path() {
            if !input.is_file() {
                return Err(ConfigError::InputNotFound(input.to_path_buf()));
            }
        }
        if let Some(ref json_out) = self.json_out {
            if json_out.is_dir() {
                return Err(ConfigError::JsonOutIsDirectory(json_out.clone()));
            }
        }
        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Buffer size of zero
    #[error("--buffer-size must be at least 1 byte")]
    ZeroBufferSize,

    /// Line limit of zero
    #[error("--max-line-length must be at least 1 byte")]
    ZeroMaxLineLength,

    /// Input file missing
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// JSON output path is a directory
    #[error("JSON output path is a directory: {0}")]
    JsonOutIsDirectory(PathBuf),
}
