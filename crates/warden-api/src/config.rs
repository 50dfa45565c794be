// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use serde::{Deserialize, Serialize};
use warden_core::{ConfigurationError, SigningKeys};

/// Top-level configuration for the API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// CORS settings.
    pub cors: CorsConfig,

    /// Authentication settings.
    pub auth: AuthConfig,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors: CorsConfig::default(),
            auth: AuthConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// The socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Sets the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the signing secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.auth.secret = secret.into();
        self
    }

    /// Sets the token time-to-live in milliseconds.
    pub fn with_token_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.auth.token_ttl_ms = ttl_ms;
        self
    }

    /// Checks that the auth section can actually back a token service.
    /// Run at startup so misconfiguration fails before binding a socket.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        SigningKeys::from_base64_secret(&self.auth.secret)?;
        if self.auth.token_ttl_ms < 0 {
            return Err(ConfigurationError::InvalidTtl(self.auth.token_ttl_ms));
        }
        Ok(())
    }
}

/// CORS settings. The defaults are permissive; lock down
/// `allowed_origins` for anything internet-facing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Whether the CORS layer is installed at all.
    pub enabled: bool,

    /// Allowed origins. `["*"]` means any origin.
    pub allowed_origins: Vec<String>,

    /// Allowed methods. `["*"]` means any method.
    pub allowed_methods: Vec<String>,

    /// Allowed request headers. `["*"]` means any header.
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["*".to_string()],
            allowed_headers: vec!["*".to_string()],
        }
    }
}

/// Authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base64-encoded signing secret. Must decode to at least 32 bytes.
    pub secret: String,

    /// Token time-to-live in milliseconds.
    pub token_ttl_ms: i64,

    /// Ordered path prefixes the request gate skips entirely. Requests
    /// under these prefixes never have their Authorization header parsed.
    pub bypass_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl_ms: 3_600_000,
            bypass_paths: vec![
                "/api/auth/".to_string(),
                "/api/health".to_string(),
                "/docs/".to_string(),
            ],
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
