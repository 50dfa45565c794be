// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request-scoped authentication context.
//!
//! The request gate attaches one [`AuthContext`] to every request's
//! extensions. There is no ambient or thread-local identity anywhere in
//! the service; handlers and layers read identity from this value only.

use uuid::Uuid;
use warden_core::{Principal, Role};

/// Sentinel username carried by the anonymous context.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Identity attached to a single request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Username, or [`ANONYMOUS_USER`].
    pub username: String,
    /// Numeric principal id, absent for anonymous requests.
    pub principal_id: Option<i64>,
    /// Role, absent for anonymous requests.
    pub role: Option<Role>,
    /// Email, absent for anonymous requests.
    pub email: Option<String>,
    /// Display name, if the principal has one.
    pub name: Option<String>,
    /// Client IP as reported by forwarding headers, if known.
    pub client_ip: Option<String>,
    /// Per-request correlation id.
    pub request_id: Uuid,
}

impl AuthContext {
    /// The context attached when authentication did not succeed, for any
    /// reason. Carries no identity; the policy layer decides whether the
    /// request may proceed anyway.
    pub fn anonymous() -> Self {
        Self {
            username: ANONYMOUS_USER.to_string(),
            principal_id: None,
            role: None,
            email: None,
            name: None,
            client_ip: None,
            request_id: Uuid::now_v7(),
        }
    }

    /// Builds an authenticated context from a freshly loaded principal.
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            username: principal.username.clone(),
            principal_id: Some(principal.id),
            role: Some(principal.role),
            email: Some(principal.email.clone()),
            name: principal.name.clone(),
            client_ip: None,
            request_id: Uuid::now_v7(),
        }
    }

    /// Sets the client IP.
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Whether this context carries no authenticated identity.
    pub fn is_anonymous(&self) -> bool {
        self.role.is_none()
    }

    /// Whether the context holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// =============================================================================
// Tests
// =============================================================================
