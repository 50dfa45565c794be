// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token wire codec.
//!
//! [`TokenCodec`] turns [`Claims`] into signed compact tokens and back.
//! It verifies structure and signature only; expiry is checked one layer
//! up, in the token service, so that callers which need to inspect an
//! expired token (diagnostics, claim extraction) still can.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Header, Validation};
use serde::Deserialize;

use crate::claims::Claims;
use crate::error::{DecodeError, EncodeError};
use crate::keys::SigningKeys;

/// The only algorithm this service signs with or accepts.
const ALGORITHM_NAME: &str = "HS256";

#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

/// Encodes and decodes signed tokens over a fixed HMAC-SHA256 key pair.
#[derive(Debug)]
pub struct TokenCodec {
    keys: SigningKeys,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec over the given key pair.
    pub fn new(keys: SigningKeys) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is the token service's concern, not the codec's.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        Self { keys, validation }
    }

    /// Signs a claims set into a compact token string.
    pub fn encode(&self, claims: &Claims) -> Result<String, EncodeError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, self.keys.encoding())
            .map_err(|e| EncodeError(e.to_string()))
    }

    /// Verifies a compact token and returns its claims.
    ///
    /// An expired token with a valid signature decodes successfully.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        check_header_algorithm(token)?;

        jsonwebtoken::decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => DecodeError::BadSignature,
                ErrorKind::InvalidAlgorithm => {
                    DecodeError::UnsupportedAlgorithm(ALGORITHM_NAME.to_string())
                }
                _ => DecodeError::Malformed,
            })
    }
}

/// Inspects the token header before signature verification so that an
/// unexpected algorithm (`none` included) is reported as such rather than
/// collapsing into a generic parse failure.
fn check_header_algorithm(token: &str) -> Result<(), DecodeError> {
    let mut segments = token.split('.');
    let header_segment = segments.next().ok_or(DecodeError::Malformed)?;
    if segments.count() != 2 {
        return Err(DecodeError::Malformed);
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|_| DecodeError::Malformed)?;
    let header: RawHeader =
        serde_json::from_slice(&header_bytes).map_err(|_| DecodeError::Malformed)?;

    match header.alg.as_deref() {
        Some(ALGORITHM_NAME) => Ok(()),
        Some(other) => Err(DecodeError::UnsupportedAlgorithm(other.to_string())),
        None => Err(DecodeError::Malformed),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Role;
    use base64::engine::general_purpose::STANDARD;
    use chrono::{Duration, Utc};

    fn codec_with_secret(byte: u8) -> TokenCodec {
        let secret = STANDARD.encode([byte; 32]);
        TokenCodec::new(SigningKeys::from_base64_secret(&secret).unwrap())
    }

    fn sample_claims() -> Claims {
        let now = Utc::now();
        Claims::builder("alice")
            .id(1)
            .email("alice@example.com")
            .role(Role::User)
            .issued_at(now)
            .expires_at(now + Duration::seconds(300))
            .build()
    }

    #[test]
    fn test_codec_round_trip_preserves_claims() {
        let codec = codec_with_secret(1);
        let claims = sample_claims();
        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_codec_expired_token_still_decodes() {
        let codec = codec_with_secret(1);
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims::builder("alice")
            .issued_at(past)
            .expires_at(past + Duration::seconds(1))
            .build();
        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token).unwrap().sub, "alice");
    }

    #[test]
    fn test_codec_tampered_payload_is_bad_signature() {
        let codec = codec_with_secret(1);
        let token = codec.encode(&sample_claims()).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let forged = serde_json::json!({
            "sub": "mallory", "id": 1, "email": "alice@example.com",
            "role": "ADMIN", "iat": 0, "exp": 9_999_999_999i64,
        });
        parts[1] = URL_SAFE_NO_PAD.encode(forged.to_string());
        let tampered = parts.join(".");

        assert_eq!(codec.decode(&tampered), Err(DecodeError::BadSignature));
    }

    #[test]
    fn test_codec_wrong_key_is_bad_signature() {
        let token = codec_with_secret(1).encode(&sample_claims()).unwrap();
        assert_eq!(
            codec_with_secret(2).decode(&token),
            Err(DecodeError::BadSignature)
        );
    }

    #[test]
    fn test_codec_garbage_is_malformed() {
        let codec = codec_with_secret(1);
        assert_eq!(codec.decode(""), Err(DecodeError::Malformed));
        assert_eq!(codec.decode("not a token"), Err(DecodeError::Malformed));
        assert_eq!(codec.decode("a.b"), Err(DecodeError::Malformed));
        assert_eq!(codec.decode("a.b.c.d"), Err(DecodeError::Malformed));
    }

    #[test]
    fn test_codec_alg_none_is_unsupported() {
        let codec = codec_with_secret(1);
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"alice"}"#);
        let token = format!("{header}.{payload}.");
        assert_eq!(
            codec.decode(&token),
            Err(DecodeError::UnsupportedAlgorithm("none".to_string()))
        );
    }

    #[test]
    fn test_codec_foreign_alg_is_unsupported() {
        let codec = codec_with_secret(1);
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"alice"}"#);
        let token = format!("{header}.{payload}.sig");
        assert_eq!(
            codec.decode(&token),
            Err(DecodeError::UnsupportedAlgorithm("RS256".to_string()))
        );
    }
}
