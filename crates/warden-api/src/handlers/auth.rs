// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use warden_core::{NewPrincipal, StoreError};

use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::extractors::{Auth, ClientIp, OptionalAuth};
use crate::response::{ApiResponse, AuthResponse, PrincipalView, ValidateResponse};
use crate::state::AppState;

/// Login request body. The identifier may be a username or an email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub username_or_email: String,
    /// Plaintext password.
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Optional display name.
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Token validation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// The raw token to check.
    pub token: String,
}

/// `POST /api/auth/login`
///
/// Verifies credentials against the principal store and issues a token.
/// Unknown identifiers, wrong passwords and disabled accounts are all
/// reported as the same `401`.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let mut errors = ValidationErrors::new();
    if req.username_or_email.trim().is_empty() {
        errors.add("username_or_email", "must not be empty");
    }
    if req.password.is_empty() {
        errors.add("password", "must not be empty");
    }
    errors.into_result()?;

    let principal = state
        .store()
        .verify_credentials(req.username_or_email.trim(), &req.password)
        .await
        .map_err(|err| match err {
            StoreError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            _ => ApiError::unauthorized("invalid credentials"),
        })?;

    let token = state.tokens().issue(&principal)?;
    info!(
        user = %principal.username,
        client_ip = ?client_ip,
        "login succeeded"
    );

    Ok(Json(ApiResponse::ok(AuthResponse::issued(
        token,
        state.tokens().ttl_secs(),
        &principal,
    ))))
}

/// `POST /api/auth/register`
///
/// Creates an account with the default role and immediately issues a
/// token, so a fresh registration is also a login. Duplicate usernames
/// and emails come back as `409`.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    validate_registration(&req)?;

    let principal = state
        .store()
        .create(NewPrincipal {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            password: req.password,
            name: req.full_name.filter(|n| !n.trim().is_empty()),
        })
        .await?;

    let token = state.tokens().issue(&principal)?;
    info!(user = %principal.username, "registered new principal");

    Ok(Json(ApiResponse::ok(AuthResponse::issued(
        token,
        state.tokens().ttl_secs(),
        &principal,
    ))))
}

/// `POST /api/auth/logout`
///
/// Stateless no-op. There is no server-side token state to clear, so the
/// presented token stays valid until its expiry instant. The endpoint
/// exists so clients have a uniform logout call to drop their copy.
pub async fn logout(OptionalAuth(ctx): OptionalAuth) -> Json<ApiResponse<()>> {
    if let Some(ctx) = ctx {
        debug!(user = %ctx.username, "logout requested");
    }
    Json(ApiResponse::message("logged out"))
}

/// `POST /api/auth/validate`
///
/// Reports whether a raw token is well-formed, signed by this service and
/// unexpired, along with its subject and role when it is.
pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Json<ApiResponse<ValidateResponse>> {
    let tokens = state.tokens();
    if !tokens.is_valid(&req.token) {
        return Json(ApiResponse::ok(ValidateResponse::invalid()));
    }

    let (subject, role) = match (tokens.subject(&req.token), tokens.role(&req.token)) {
        (Ok(subject), Ok(role)) => (subject, role),
        _ => return Json(ApiResponse::ok(ValidateResponse::invalid())),
    };

    Json(ApiResponse::ok(ValidateResponse {
        valid: true,
        subject: Some(subject),
        role: Some(role),
    }))
}

/// `GET /api/auth/me`
///
/// Returns the fresh store record for the authenticated principal.
pub async fn current_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<ApiResponse<PrincipalView>>> {
    let principal = state
        .store()
        .find_by_username_or_email(&ctx.username)
        .await?;
    Ok(Json(ApiResponse::ok(PrincipalView::from(&principal))))
}

fn validate_registration(req: &RegisterRequest) -> ApiResult<()> {
    let mut errors = ValidationErrors::new();
    if req.username.trim().len() < 3 {
        errors.add("username", "must be at least 3 characters");
    }
    if !req.email.contains('@') {
        errors.add("email", "must be a valid email address");
    }
    if req.password.len() < 8 {
        errors.add("password", "must be at least 8 characters");
    }
    errors.into_result()
}

// =============================================================================
// Tests
// =============================================================================
