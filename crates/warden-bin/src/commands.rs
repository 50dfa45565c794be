// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Subcommand implementations.

use std::path::Path;

use tracing::{info, warn};
use warden_api::{ApiConfig, ApiServer, AppState};

use crate::error::{BinError, BinResult};
use crate::shutdown;

/// Loads the configuration file, falling back to defaults when the file
/// does not exist so that flag and env overrides alone can run a server.
pub fn load_config(path: &Path) -> BinResult<ApiConfig> {
    if !path.exists() {
        warn!(path = %path.display(), "configuration file not found, using defaults");
        return Ok(ApiConfig::default());
    }
    let text = std::fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|e| BinError::config(format!("{}: {e}", path.display())))
}

/// Runs the server until a shutdown signal arrives.
pub async fn run(
    config_path: &Path,
    secret: Option<String>,
    port: Option<u16>,
) -> BinResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(secret) = secret {
        config.auth.secret = secret;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config.validate()?;

    info!(
        addr = %config.bind_addr(),
        token_ttl_ms = config.auth.token_ttl_ms,
        "starting wardend"
    );

    let state = AppState::builder(config).build()?;
    ApiServer::new(state)
        .run_with_shutdown(shutdown::wait_for_shutdown())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Prints a fresh base64 signing secret.
pub fn gen_secret() {
    println!("{}", warden_core::generate_secret());
}

/// Prints version information.
pub fn version() {
    println!(
        "wardend {} (core {}, api {})",
        env!("CARGO_PKG_VERSION"),
        warden_core::VERSION,
        warden_api::VERSION
    );
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_commands_load_config_missing_file_defaults() {
        let config = load_config(Path::new("/nonexistent/warden.toml")).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_commands_load_config_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9999\n[auth]\ntoken_ttl_ms = 1000").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.auth.token_ttl_ms, 1000);
    }

    #[test]
    fn test_commands_load_config_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(BinError::Configuration(_))
        ));
    }
}
