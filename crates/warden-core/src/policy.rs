// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization policy.
//!
//! An [`AccessPolicy`] is an ordered rule table built once at startup and
//! shared read-only afterwards. Evaluation walks the table top to bottom
//! and the first rule whose path prefix and method filter match decides
//! the outcome; requests matching no rule fall back to requiring any
//! authenticated principal.

use crate::principal::Role;

/// Outcome of evaluating a request against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The request may proceed.
    Granted,
    /// No authenticated principal was present and the rule requires one.
    Unauthenticated,
    /// A principal was present but its role does not satisfy the rule.
    Forbidden,
}

/// A single policy rule.
#[derive(Debug, Clone)]
pub struct AccessRule {
    /// Path prefix the rule applies to.
    pub prefix: String,
    /// HTTP methods the rule applies to; `None` matches every method.
    pub methods: Option<Vec<String>>,
    /// Roles that satisfy the rule. Empty means any authenticated principal.
    pub roles: Vec<Role>,
    /// Anonymous requests are allowed through.
    pub allow_anonymous: bool,
}

impl AccessRule {
    fn matches(&self, path: &str, method: &str) -> bool {
        if !path.starts_with(self.prefix.as_str()) {
            return false;
        }
        match &self.methods {
            None => true,
            Some(methods) => methods.iter().any(|m| m.eq_ignore_ascii_case(method)),
        }
    }

    fn decide(&self, role: Option<Role>) -> AccessDecision {
        if self.allow_anonymous {
            return AccessDecision::Granted;
        }
        let Some(role) = role else {
            return AccessDecision::Unauthenticated;
        };
        if self.roles.is_empty() || self.roles.contains(&role) {
            AccessDecision::Granted
        } else {
            AccessDecision::Forbidden
        }
    }
}

/// Ordered, first-match-wins rule table.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    /// Starts building a policy.
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Evaluates a request. `role` is the authenticated principal's role,
    /// or `None` for an anonymous request.
    pub fn evaluate(&self, path: &str, method: &str, role: Option<Role>) -> AccessDecision {
        for rule in &self.rules {
            if rule.matches(path, method) {
                return rule.decide(role);
            }
        }
        // Default rule: any authenticated principal.
        if role.is_some() {
            AccessDecision::Granted
        } else {
            AccessDecision::Unauthenticated
        }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }
}

/// Builder for [`AccessPolicy`]. Rules are evaluated in insertion order.
#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    rules: Vec<AccessRule>,
}

impl AccessPolicyBuilder {
    /// Allows anonymous access to everything under `prefix`.
    pub fn allow_anonymous(mut self, prefix: impl Into<String>) -> Self {
        self.rules.push(AccessRule {
            prefix: prefix.into(),
            methods: None,
            roles: Vec::new(),
            allow_anonymous: true,
        });
        self
    }

    /// Requires any authenticated principal under `prefix`.
    pub fn require_authenticated(mut self, prefix: impl Into<String>) -> Self {
        self.rules.push(AccessRule {
            prefix: prefix.into(),
            methods: None,
            roles: Vec::new(),
            allow_anonymous: false,
        });
        self
    }

    /// Requires one of `roles` under `prefix`, for every method.
    pub fn require_roles(self, prefix: impl Into<String>, roles: &[Role]) -> Self {
        self.require_roles_for(prefix, None, roles)
    }

    /// Requires one of `roles` under `prefix`, restricted to the given
    /// methods. `None` matches every method.
    pub fn require_roles_for(
        mut self,
        prefix: impl Into<String>,
        methods: Option<&[&str]>,
        roles: &[Role],
    ) -> Self {
        self.rules.push(AccessRule {
            prefix: prefix.into(),
            methods: methods.map(|ms| ms.iter().map(|m| m.to_uppercase()).collect()),
            roles: roles.to_vec(),
            allow_anonymous: false,
        });
        self
    }

    /// Finishes the build.
    pub fn build(self) -> AccessPolicy {
        AccessPolicy { rules: self.rules }
    }
}

// =============================================================================
// Tests
// =============================================================================
