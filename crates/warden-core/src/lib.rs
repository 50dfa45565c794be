// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Warden core: stateless token authentication and authorization.
//!
//! This crate holds the HTTP-free heart of the service:
//!
//! - [`keys`]: signing key derivation from a base64 secret
//! - [`codec`]: the token wire codec (structure and signature only)
//! - [`token`]: issue, validity and claim extraction over the codec
//! - [`claims`]: the signed claims model
//! - [`principal`]: accounts, roles and the [`principal::PrincipalStore`]
//!   boundary with an in-memory implementation
//! - [`policy`]: the ordered access rule table
//! - [`error`]: the error taxonomy shared by all of the above
//!
//! Everything here is built once at startup and shared read-only; the only
//! I/O on the request path is the principal store lookup.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod claims;
pub mod codec;
pub mod error;
pub mod keys;
pub mod policy;
pub mod principal;
pub mod token;

pub use claims::{Claims, ClaimsBuilder};
pub use codec::TokenCodec;
pub use error::{ConfigurationError, DecodeError, EncodeError, ExtractError, StoreError};
pub use keys::{generate_secret, SigningKeys, MIN_SECRET_BYTES};
pub use policy::{AccessDecision, AccessPolicy, AccessPolicyBuilder, AccessRule};
pub use principal::{
    MemoryPrincipalStore, NewPrincipal, Principal, PrincipalStore, Role,
};
pub use token::TokenService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
