// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issue and validity service.
//!
//! [`TokenService`] owns the codec and the configured time-to-live. It is
//! the layer that knows about time: a token is valid over `[iat, iat + ttl)`
//! with an exclusive upper bound, so a token checked at exactly its expiry
//! instant is already expired.
//!
//! Issued tokens are not recorded anywhere and cannot be revoked; a token
//! stays usable until its expiry instant regardless of logouts.

use chrono::{DateTime, Duration, Utc};

use crate::claims::Claims;
use crate::codec::TokenCodec;
use crate::error::{ConfigurationError, DecodeError, EncodeError, ExtractError};
use crate::keys::SigningKeys;
use crate::principal::{Principal, Role};

/// Issues tokens for principals and answers validity questions.
#[derive(Debug)]
pub struct TokenService {
    codec: TokenCodec,
    ttl: Duration,
}

impl TokenService {
    /// Creates a service over the given keys with a time-to-live in
    /// milliseconds. A zero ttl is accepted and produces tokens that are
    /// expired the instant they are issued; a negative ttl is rejected.
    pub fn new(keys: SigningKeys, ttl_ms: i64) -> Result<Self, ConfigurationError> {
        if ttl_ms < 0 {
            return Err(ConfigurationError::InvalidTtl(ttl_ms));
        }
        Ok(Self {
            codec: TokenCodec::new(keys),
            ttl: Duration::milliseconds(ttl_ms),
        })
    }

    /// The configured time-to-live as whole seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issues a token for the principal, dated now.
    pub fn issue(&self, principal: &Principal) -> Result<String, EncodeError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a token dated at an explicit instant.
    pub fn issue_at(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<String, EncodeError> {
        let mut builder = Claims::builder(&principal.username)
            .id(principal.id)
            .email(&principal.email)
            .role(principal.role)
            .issued_at(now)
            .expires_at(now + self.ttl);
        if let Some(name) = &principal.name {
            builder = builder.name(name);
        }
        self.codec.encode(&builder.build())
    }

    /// Whether the token has a valid signature and is not yet expired.
    /// Never errors: any decode failure is simply `false`.
    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Utc::now())
    }

    /// [`Self::is_valid`] with an explicit clock.
    pub fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.codec.decode(token) {
            Ok(claims) => !claims.is_expired_at(now),
            Err(_) => false,
        }
    }

    /// Whether the token is valid and bound to this principal, meaning its
    /// subject equals the principal's username.
    pub fn is_valid_for(&self, token: &str, principal: &Principal) -> bool {
        self.is_valid_for_at(token, principal, Utc::now())
    }

    /// [`Self::is_valid_for`] with an explicit clock.
    pub fn is_valid_for_at(
        &self,
        token: &str,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> bool {
        match self.codec.decode(token) {
            Ok(claims) => !claims.is_expired_at(now) && claims.sub == principal.username,
            Err(_) => false,
        }
    }

    /// Decodes the token and returns its full claims set. Expired tokens
    /// decode successfully.
    pub fn claims(&self, token: &str) -> Result<Claims, DecodeError> {
        self.codec.decode(token)
    }

    /// Reads a single claim out of a token via an accessor closure.
    /// `name` labels the claim in the error when the accessor yields none.
    pub fn extract_claim<T>(
        &self,
        token: &str,
        name: &'static str,
        get: impl FnOnce(&Claims) -> Option<T>,
    ) -> Result<T, ExtractError> {
        let claims = self.codec.decode(token)?;
        get(&claims).ok_or(ExtractError::ClaimNotPresent(name))
    }

    /// The token's subject.
    pub fn subject(&self, token: &str) -> Result<String, ExtractError> {
        self.extract_claim(token, "sub", |c| {
            (!c.sub.is_empty()).then(|| c.sub.clone())
        })
    }

    /// The token's numeric principal id.
    pub fn principal_id(&self, token: &str) -> Result<i64, ExtractError> {
        self.extract_claim(token, "id", |c| Some(c.id))
    }

    /// The token's email claim.
    pub fn email(&self, token: &str) -> Result<String, ExtractError> {
        self.extract_claim(token, "email", |c| {
            (!c.email.is_empty()).then(|| c.email.clone())
        })
    }

    /// The token's display-name claim, if present.
    pub fn display_name(&self, token: &str) -> Result<String, ExtractError> {
        self.extract_claim(token, "name", |c| c.name.clone())
    }

    /// The token's role claim.
    pub fn role(&self, token: &str) -> Result<Role, ExtractError> {
        self.extract_claim(token, "role", |c| Some(c.role))
    }
}

// =============================================================================
// Tests
// =============================================================================
