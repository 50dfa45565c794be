// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Principal model and store.
//!
//! A [`Principal`] is an account record as the rest of the service sees
//! it: no credential material. The [`PrincipalStore`] trait is the only
//! I/O boundary on the request path; the bundled [`MemoryPrincipalStore`]
//! keeps records behind an async lock and stores argon2id password hashes.

use std::collections::HashMap;

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreError;

// =============================================================================
// Role
// =============================================================================

/// Authorization role. Every principal holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account.
    User,
    /// Administrative account.
    Admin,
}

impl Role {
    /// Wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Parses a wire representation back into a role.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(Self::User),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Principal
// =============================================================================

/// An account record, minus credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Numeric identifier, unique within the store.
    pub id: i64,
    /// Login name, unique within the store.
    pub username: String,
    /// Email address, unique within the store.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
    /// The principal's role.
    pub role: Role,
    /// Disabled principals cannot authenticate.
    pub enabled: bool,
}

/// Input for creating a new principal. Carries the plaintext password;
/// the store hashes it and never retains the plaintext.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    /// Desired login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password, hashed on insert.
    pub password: String,
    /// Optional display name.
    pub name: Option<String>,
}

// =============================================================================
// Store trait
// =============================================================================

/// Account lookup and registration.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Finds a principal whose username or email equals `identifier`.
    /// Disabled principals are returned; callers decide what disabled means
    /// in their context.
    async fn find_by_username_or_email(&self, identifier: &str)
        -> Result<Principal, StoreError>;

    /// Verifies a password against the record matching `identifier`.
    ///
    /// Unknown identifiers, wrong passwords and disabled accounts all
    /// report [`StoreError::NotFound`] so callers cannot distinguish them.
    async fn verify_credentials(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Principal, StoreError>;

    /// Registers a new principal with the default role, enabled.
    async fn create(&self, new: NewPrincipal) -> Result<Principal, StoreError>;
}

// =============================================================================
// In-memory store
// =============================================================================

struct StoredPrincipal {
    principal: Principal,
    password_hash: String,
}

#[derive(Default)]
struct MemoryInner {
    by_username: HashMap<String, StoredPrincipal>,
    email_index: HashMap<String, String>,
    next_id: i64,
}

/// Hash-map backed [`PrincipalStore`] with argon2id password hashing.
#[derive(Default)]
pub struct MemoryPrincipalStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryPrincipalStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a principal with an explicit role. Used for seeding
    /// administrative accounts; the trait-level [`PrincipalStore::create`]
    /// always assigns [`Role::User`].
    pub async fn create_with_role(
        &self,
        new: NewPrincipal,
        role: Role,
    ) -> Result<Principal, StoreError> {
        let password_hash = hash_password(&new.password)?;
        let mut inner = self.inner.write().await;

        if inner.by_username.contains_key(&new.username) {
            return Err(StoreError::DuplicateUsername(new.username));
        }
        if inner.email_index.contains_key(&new.email) {
            return Err(StoreError::DuplicateEmail(new.email));
        }

        inner.next_id += 1;
        let principal = Principal {
            id: inner.next_id,
            username: new.username.clone(),
            email: new.email.clone(),
            name: new.name,
            role,
            enabled: true,
        };
        inner
            .email_index
            .insert(new.email, new.username.clone());
        inner.by_username.insert(
            new.username,
            StoredPrincipal {
                principal: principal.clone(),
                password_hash,
            },
        );
        Ok(principal)
    }

    /// Flips the enabled flag on an existing principal.
    pub async fn set_enabled(&self, username: &str, enabled: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .by_username
            .get_mut(username)
            .ok_or_else(|| StoreError::NotFound(username.to_string()))?;
        record.principal.enabled = enabled;
        Ok(())
    }

    async fn lookup(&self, identifier: &str) -> Result<(Principal, String), StoreError> {
        let inner = self.inner.read().await;
        let username = match inner.by_username.get(identifier) {
            Some(_) => identifier,
            None => inner
                .email_index
                .get(identifier)
                .map(String::as_str)
                .ok_or_else(|| StoreError::NotFound(identifier.to_string()))?,
        };
        let record = inner
            .by_username
            .get(username)
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))?;
        Ok((record.principal.clone(), record.password_hash.clone()))
    }
}

#[async_trait]
impl PrincipalStore for MemoryPrincipalStore {
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Principal, StoreError> {
        self.lookup(identifier).await.map(|(principal, _)| principal)
    }

    async fn verify_credentials(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Principal, StoreError> {
        let (principal, hash) = self.lookup(identifier).await?;
        if !principal.enabled || !verify_password(password, &hash) {
            return Err(StoreError::NotFound(identifier.to_string()));
        }
        Ok(principal)
    }

    async fn create(&self, new: NewPrincipal) -> Result<Principal, StoreError> {
        self.create_with_role(new, Role::User).await
    }
}

// =============================================================================
// Password hashing
// =============================================================================

/// Hashes a plaintext password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Unavailable(e.to_string()))
}

/// Verifies a plaintext password against a stored argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// =============================================================================
// Tests
// =============================================================================
