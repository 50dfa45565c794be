// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `wardend`: the warden authentication service daemon.
//!
//! Thin binary shell around `warden-api`: CLI parsing, logging setup,
//! configuration loading and shutdown signal wiring.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod shutdown;

pub use cli::{Cli, Commands, LogFormat};
pub use error::{BinError, BinResult};
