// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Command-line interface for `wardend`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Stateless token authentication service.
#[derive(Debug, Parser)]
#[command(name = "wardend", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(
        short,
        long,
        global = true,
        env = "WARDEN_CONFIG",
        default_value = "warden.toml"
    )]
    pub config: PathBuf,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, global = true, env = "WARDEN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(
        long,
        global = true,
        env = "WARDEN_LOG_FORMAT",
        value_enum,
        default_value = "text"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run, defaulting to [`Commands::Run`].
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run {
            secret: None,
            port: None,
        })
    }
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Start the server.
    Run {
        /// Base64 signing secret, overriding the configuration file.
        #[arg(long, env = "WARDEN_SECRET")]
        secret: Option<String>,

        /// Bind port, overriding the configuration file.
        #[arg(long, env = "WARDEN_PORT")]
        port: Option<u16>,
    },

    /// Generate a fresh base64 signing secret and print it.
    GenSecret,

    /// Print version information.
    Version,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text.
    Text,
    /// One JSON object per line.
    Json,
    /// Compact single-line text.
    Compact,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["wardend"]);
        assert_eq!(cli.config, PathBuf::from("warden.toml"));
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(matches!(
            cli.effective_command(),
            Commands::Run {
                secret: None,
                port: None
            }
        ));
    }

    #[test]
    fn test_cli_run_overrides() {
        let cli = Cli::parse_from(["wardend", "run", "--secret", "abc", "--port", "9000"]);
        match cli.effective_command() {
            Commands::Run { secret, port } => {
                assert_eq!(secret.as_deref(), Some("abc"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_gen_secret_subcommand() {
        let cli = Cli::parse_from(["wardend", "gen-secret"]);
        assert!(matches!(cli.command, Some(Commands::GenSecret)));
    }

    #[test]
    fn test_cli_log_format_values() {
        let cli = Cli::parse_from(["wardend", "--log-format", "json"]);
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
