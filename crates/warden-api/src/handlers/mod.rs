// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP request handlers.

pub mod auth;
pub mod health;

pub use auth::{current_user, login, logout, register, validate};
pub use health::health;
