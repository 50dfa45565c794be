// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Warden HTTP surface.
//!
//! This crate puts an axum server around `warden-core`:
//!
//! - [`middleware::GateLayer`] resolves identity on every request and
//!   never rejects; failures degrade to the anonymous context
//! - [`middleware::AccessLayer`] enforces the rule table and is the only
//!   place `401`/`403` originate
//! - [`handlers`] implement login, registration, token validation, the
//!   current-user view, the stateless logout and the health probe
//! - [`server::ApiServer`] wires routes, CORS, tracing, timeouts and
//!   graceful shutdown together

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use config::{ApiConfig, AuthConfig, CorsConfig};
pub use context::{AuthContext, ANONYMOUS_USER};
pub use error::{ApiError, ApiResult, ValidationErrors};
pub use extractors::{Auth, ClientIp, OptionalAuth};
pub use response::{ApiResponse, AuthResponse, HealthResponse, PrincipalView, ValidateResponse};
pub use server::ApiServer;
pub use state::{standard_policy, AppState, AppStateBuilder};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
