// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the warden core.

use thiserror::Error;

/// Errors raised while building the signing key material or the token
/// service configuration. These are startup-fatal: a service with a bad
/// signing secret must not come up.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The signing secret is missing or empty.
    #[error("signing secret is missing or empty")]
    MissingSecret,

    /// The signing secret is not valid base64.
    #[error("signing secret is not valid base64: {0}")]
    InvalidSecret(String),

    /// The decoded signing secret is too short for HMAC-SHA256.
    #[error("signing secret is {actual} bytes after decoding, {required} required")]
    SecretTooShort {
        /// Decoded length in bytes.
        actual: usize,
        /// Minimum acceptable length in bytes.
        required: usize,
    },

    /// The token time-to-live is negative.
    #[error("token ttl must not be negative, got {0} ms")]
    InvalidTtl(i64),
}

/// Error raised while encoding a token. Encoding a well-formed claims set
/// cannot fail; this surfaces only if payload serialization itself breaks.
#[derive(Debug, Error)]
#[error("token encoding failed: {0}")]
pub struct EncodeError(pub String);

/// Errors raised while decoding a token.
///
/// Expiry is deliberately not part of this taxonomy: the codec verifies
/// structure and signature only, and the token service layers time on top.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The token is not a structurally valid JWT.
    #[error("malformed token")]
    Malformed,

    /// The signature does not match the token contents.
    #[error("token signature verification failed")]
    BadSignature,

    /// The token header declares an algorithm other than HS256.
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Errors raised while reading a single claim out of a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The token decoded but does not carry the requested claim.
    #[error("claim {0:?} not present in token")]
    ClaimNotPresent(&'static str),

    /// The token could not be decoded at all.
    #[error("token decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors raised by principal store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No principal matches the given identifier.
    #[error("principal not found: {0}")]
    NotFound(String),

    /// A principal with this username already exists.
    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    /// A principal with this email already exists.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// The backing store could not be reached or failed internally.
    #[error("principal store unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_configuration_display() {
        let err = ConfigurationError::SecretTooShort {
            actual: 16,
            required: 32,
        };
        assert_eq!(
            err.to_string(),
            "signing secret is 16 bytes after decoding, 32 required"
        );
    }

    #[test]
    fn test_error_decode_display() {
        assert_eq!(DecodeError::Malformed.to_string(), "malformed token");
        assert_eq!(
            DecodeError::UnsupportedAlgorithm("none".to_string()).to_string(),
            "unsupported token algorithm: none"
        );
    }

    #[test]
    fn test_error_extract_from_decode() {
        let err = ExtractError::from(DecodeError::BadSignature);
        assert_eq!(err, ExtractError::Decode(DecodeError::BadSignature));
    }

    #[test]
    fn test_error_store_display() {
        let err = StoreError::DuplicateEmail("a@b.io".to_string());
        assert_eq!(err.to_string(), "email already registered: a@b.io");
    }
}
