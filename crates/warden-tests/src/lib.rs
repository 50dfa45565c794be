// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Integration test support for the warden workspace.
//!
//! The [`common`] module builds fully wired routers over a seeded
//! in-memory principal store so the `tests/` suites exercise the same
//! middleware stack the binary serves.

pub mod common;
