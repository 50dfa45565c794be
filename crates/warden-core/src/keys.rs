// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signing key derivation.
//!
//! The HMAC-SHA256 key pair is derived exactly once, at startup, from a
//! base64-encoded secret. The raw key material never appears in logs or
//! `Debug` output.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use jsonwebtoken::{DecodingKey, EncodingKey};
use password_hash::rand_core::{OsRng, RngCore};

use crate::error::ConfigurationError;

/// Minimum decoded secret length in bytes. HMAC-SHA256 needs a key at
/// least as long as its output to keep the full security margin.
pub const MIN_SECRET_BYTES: usize = 32;

/// Derived signing keys for token encode and decode.
pub struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    /// Derives the key pair from a base64-encoded secret.
    ///
    /// The secret must decode to at least [`MIN_SECRET_BYTES`] bytes.
    pub fn from_base64_secret(secret: &str) -> Result<Self, ConfigurationError> {
        if secret.trim().is_empty() {
            return Err(ConfigurationError::MissingSecret);
        }

        let raw = BASE64
            .decode(secret.trim())
            .map_err(|e| ConfigurationError::InvalidSecret(e.to_string()))?;

        if raw.len() < MIN_SECRET_BYTES {
            return Err(ConfigurationError::SecretTooShort {
                actual: raw.len(),
                required: MIN_SECRET_BYTES,
            });
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(&raw),
            decoding: DecodingKey::from_secret(&raw),
        })
    }

    /// The encode-side key.
    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    /// The decode-side key.
    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys").finish_non_exhaustive()
    }
}

/// Generates a fresh random signing secret, base64-encoded, long enough
/// to pass [`SigningKeys::from_base64_secret`].
pub fn generate_secret() -> String {
    let mut raw = [0u8; 48];
    OsRng.fill_bytes(&mut raw);
    BASE64.encode(raw)
}

// =============================================================================
// Tests
// =============================================================================
