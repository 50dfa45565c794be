// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Response envelopes and public view types.

use serde::{Deserialize, Serialize};
use warden_core::{Principal, Role};

/// Generic success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true` for this envelope.
    pub success: bool,

    /// The payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Optional human-readable note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wraps a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// A success with a note and no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Public view of a principal. Never carries credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalView {
    /// Numeric identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role tag.
    pub role: Role,
}

impl From<&Principal> for PrincipalView {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            username: p.username.clone(),
            email: p.email.clone(),
            name: p.name.clone(),
            role: p.role,
        }
    }
}

/// Response body for successful login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The issued token.
    pub token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    /// The authenticated principal.
    pub user: PrincipalView,
}

impl AuthResponse {
    /// Builds the response for a freshly issued token.
    pub fn issued(token: String, expires_in: i64, principal: &Principal) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: PrincipalView::from(principal),
        }
    }
}

/// Response body for token validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    /// Whether the token is structurally valid, signed by us, and unexpired.
    pub valid: bool,
    /// The token subject, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// The embedded role, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl ValidateResponse {
    /// The response for an invalid token.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            subject: None,
            role: None,
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Fixed status string.
    pub status: String,
    /// Service version.
    pub version: String,
}

impl HealthResponse {
    /// The healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            name: None,
            role: Role::User,
            enabled: true,
        }
    }

    #[test]
    fn test_response_auth_shape() {
        let resp = AuthResponse::issued("tok".to_string(), 3600, &alice());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["expires_in"], 3600);
        assert_eq!(json["user"]["username"], "alice");
        assert_eq!(json["user"]["role"], "USER");
        assert!(json["user"].get("name").is_none());
    }

    #[test]
    fn test_response_envelope() {
        let json = serde_json::to_value(ApiResponse::ok(5)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 5);

        let json = serde_json::to_value(ApiResponse::<()>::message("done")).unwrap();
        assert_eq!(json["message"], "done");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_response_validate_invalid_omits_claims() {
        let json = serde_json::to_value(ValidateResponse::invalid()).unwrap();
        assert_eq!(json["valid"], false);
        assert!(json.get("subject").is_none());
        assert!(json.get("role").is_none());
    }

    #[test]
    fn test_response_health() {
        let resp = HealthResponse::healthy();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, crate::VERSION);
    }
}
