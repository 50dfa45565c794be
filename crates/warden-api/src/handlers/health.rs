// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health handler.

use axum::Json;

use crate::response::HealthResponse;

/// `GET /api/health`
///
/// Liveness probe, open to everyone.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
