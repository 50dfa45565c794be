// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogFormat;
use crate::error::BinError;

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level; the noisy HTTP
/// internals are pinned to `warn` either way.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), BinError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level))
        .add_directive("hyper=warn".parse().map_err(init_err)?)
        .add_directive("tower=warn".parse().map_err(init_err)?);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true))
            .try_init()
            .map_err(init_err),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
            .map_err(init_err),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false))
            .try_init()
            .map_err(init_err),
    }
}

fn init_err(err: impl std::fmt::Display) -> BinError {
    BinError::init(format!("logging setup failed: {err}"))
}

// =============================================================================
// Tests
// =============================================================================
