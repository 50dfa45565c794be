// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claims model.
//!
//! A [`Claims`] value is the payload that gets signed into a token. Once
//! encoded it is immutable; nothing in the service mutates a decoded claims
//! set. Timestamps are unix seconds, which is the precision the wire format
//! carries.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::principal::Role;

/// The set of claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal's username. Never empty.
    pub sub: String,

    /// Numeric principal identifier.
    pub id: i64,

    /// Principal email address.
    pub email: String,

    /// Display name, if the principal has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The principal's role at issue time.
    pub role: Role,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiry, unix seconds. Always strictly after `iat`.
    pub exp: i64,
}

impl Claims {
    /// Starts building a claims set for the given subject.
    pub fn builder(sub: impl Into<String>) -> ClaimsBuilder {
        ClaimsBuilder::new(sub)
    }

    /// The issue instant as a UTC datetime.
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    /// The expiry instant as a UTC datetime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    /// Whether the claims are expired at `now`. The boundary is exclusive:
    /// a token whose `exp` equals `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Builder for [`Claims`].
#[derive(Debug, Clone)]
pub struct ClaimsBuilder {
    sub: String,
    id: i64,
    email: String,
    name: Option<String>,
    role: Role,
    iat: i64,
    exp: i64,
}

impl ClaimsBuilder {
    /// Creates a builder for the given subject with zeroed timestamps and
    /// the default role.
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            id: 0,
            email: String::new(),
            name: None,
            role: Role::User,
            iat: 0,
            exp: 0,
        }
    }

    /// Sets the numeric principal id.
    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Sets the email claim.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the display name claim.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the role claim.
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the issue instant.
    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.iat = at.timestamp();
        self
    }

    /// Sets the expiry instant.
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.exp = at.timestamp();
        self
    }

    /// Finishes the build.
    pub fn build(self) -> Claims {
        Claims {
            sub: self.sub,
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            iat: self.iat,
            exp: self.exp,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
