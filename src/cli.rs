// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `globwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "globwatch",
    version,
    about = "Report files matching a glob as they appear, shrink or disappear.",
    long_about = None
)]
pub struct CliArgs {
    /// Glob pattern to watch, e.g. '/var/log/app/*.log'.
    ///
    /// Overrides `[watch].pattern` from the config file. Quote it so the
    /// shell does not expand it first.
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Milliseconds between polls (0 = as fast as possible).
    ///
    /// Overrides `[watch].poll_interval_ms`; defaults to 1000.
    #[arg(long, short = 'i', value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Path to a config file (TOML).
    ///
    /// If omitted, `Globwatch.toml` in the current directory is used when it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GLOBWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved settings and current matches, then exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
