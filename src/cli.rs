// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `staticver`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "staticver",
    version,
    about = "Keep cache-busting version tokens for a static asset tree.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Staticver.toml` in the current working directory. A missing
    /// default file means built-in defaults; a missing explicit file is an
    /// error.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Static asset root; overrides `[cache].root`.
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Extra base file names to ignore (repeatable).
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Number of hex characters per token; overrides `[cache].token_len`.
    #[arg(long, value_name = "N")]
    pub token_len: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STATICVER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Prewarm once, print `<path> <token>` lines and exit without watching.
    #[arg(long)]
    pub list: bool,
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

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
