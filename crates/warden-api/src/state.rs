// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared application state.
//!
//! Everything in [`AppState`] is built once at startup and cloned cheaply
//! per request. Nothing here is mutated afterwards; the principal store is
//! the only component doing I/O.

use std::sync::Arc;

use warden_core::{
    AccessPolicy, ConfigurationError, MemoryPrincipalStore, PrincipalStore, Role, SigningKeys,
    TokenService,
};

use crate::config::ApiConfig;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ApiConfig>,
    tokens: Arc<TokenService>,
    store: Arc<dyn PrincipalStore>,
    policy: Arc<AccessPolicy>,
}

impl AppState {
    /// Starts building state from a configuration.
    pub fn builder(config: ApiConfig) -> AppStateBuilder {
        AppStateBuilder {
            config,
            store: None,
            policy: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// The principal store.
    pub fn store(&self) -> &Arc<dyn PrincipalStore> {
        &self.store
    }

    /// The access policy.
    pub fn policy(&self) -> &Arc<AccessPolicy> {
        &self.policy
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AppState`].
pub struct AppStateBuilder {
    config: ApiConfig,
    store: Option<Arc<dyn PrincipalStore>>,
    policy: Option<AccessPolicy>,
}

impl AppStateBuilder {
    /// Uses the given principal store instead of a fresh in-memory one.
    pub fn store(mut self, store: Arc<dyn PrincipalStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses the given policy instead of [`standard_policy`].
    pub fn policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Derives keys, builds the token service, and assembles the state.
    pub fn build(self) -> Result<AppState, ConfigurationError> {
        let keys = SigningKeys::from_base64_secret(&self.config.auth.secret)?;
        let tokens = TokenService::new(keys, self.config.auth.token_ttl_ms)?;
        let policy = self
            .policy
            .unwrap_or_else(|| standard_policy(&self.config));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryPrincipalStore::new()));

        Ok(AppState {
            config: Arc::new(self.config),
            tokens: Arc::new(tokens),
            store,
            policy: Arc::new(policy),
        })
    }
}

/// The stock rule table: configured bypass prefixes are open to everyone,
/// resource reads need any account, transaction mutations need an admin,
/// and everything else needs authentication.
pub fn standard_policy(config: &ApiConfig) -> AccessPolicy {
    let mut builder = AccessPolicy::builder();
    for prefix in &config.auth.bypass_paths {
        builder = builder.allow_anonymous(prefix.clone());
    }
    builder
        .require_roles_for(
            "/api/transactions",
            Some(&["POST", "PUT", "DELETE"]),
            &[Role::Admin],
        )
        .require_roles("/api/transactions", &[Role::User, Role::Admin])
        .require_roles("/api/users", &[Role::User, Role::Admin])
        .build()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::AccessDecision;

    fn config() -> ApiConfig {
        ApiConfig::default().with_secret(warden_core::generate_secret())
    }

    #[test]
    fn test_state_builds_with_defaults() {
        let state = AppState::builder(config()).build().unwrap();
        assert_eq!(state.tokens().ttl_secs(), 3600);
    }

    #[test]
    fn test_state_rejects_bad_secret() {
        let result = AppState::builder(ApiConfig::default()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_state_standard_policy_covers_bypass_and_rules() {
        let policy = standard_policy(&config());
        assert_eq!(
            policy.evaluate("/api/auth/login", "POST", None),
            AccessDecision::Granted
        );
        assert_eq!(
            policy.evaluate("/api/transactions", "DELETE", Some(Role::User)),
            AccessDecision::Forbidden
        );
        assert_eq!(
            policy.evaluate("/api/users", "GET", None),
            AccessDecision::Unauthenticated
        );
    }
}
