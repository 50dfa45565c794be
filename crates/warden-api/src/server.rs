// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server assembly.

use std::future::Future;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::CorsConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::{AccessLayer, GateLayer};
use crate::state::AppState;

/// The assembled HTTP server.
#[derive(Clone)]
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a server over shared state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// The shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Builds the full router: auth and health routes behind the gate and
    /// policy layers.
    pub fn router(&self) -> Router {
        self.router_with_resources(Router::new())
    }

    /// Builds the router with additional resource routes mounted under the
    /// same middleware stack, so they are covered by the access policy.
    pub fn router_with_resources(&self, resources: Router<AppState>) -> Router {
        let api = Router::new()
            .route("/api/health", get(handlers::health))
            .route("/api/auth/login", post(handlers::login))
            .route("/api/auth/register", post(handlers::register))
            .route("/api/auth/logout", post(handlers::logout))
            .route("/api/auth/validate", post(handlers::validate))
            .route("/api/auth/me", get(handlers::current_user))
            .merge(resources);

        let config = self.state.config();

        // Innermost first: the gate resolves identity before the policy
        // layer judges it. CORS sits outside both so preflight requests
        // short-circuit without touching auth.
        let mut router = api.with_state(self.state.clone()).layer(
            ServiceBuilder::new()
                .layer(GateLayer::new(self.state.clone()))
                .layer(AccessLayer::new(self.state.clone())),
        );

        if config.cors.enabled {
            router = router.layer(build_cors(&config.cors));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Binds the configured address and serves until the process ends.
    pub async fn run(&self) -> Result<(), ApiError> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run_with_shutdown(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let addr = self.state.config().bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ApiError::internal(format!("bind {addr}: {e}")))?;
        info!(%addr, "listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ApiError::internal(format!("serve: {e}")))
    }
}

fn build_cors(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    layer = if config.allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    };

    layer = if config.allowed_methods.iter().any(|m| m == "*") {
        layer.allow_methods(Any)
    } else {
        let methods: Vec<Method> = config
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        layer.allow_methods(methods)
    };

    if config.allowed_headers.iter().any(|h| h == "*") {
        layer.allow_headers(Any)
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer.allow_headers(headers)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn server() -> ApiServer {
        let config = ApiConfig::default().with_secret(warden_core::generate_secret());
        ApiServer::new(AppState::builder(config).build().unwrap())
    }

    #[tokio::test]
    async fn test_server_health_route_is_open() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_server_protected_route_needs_auth() {
        let response = server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/api/other")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_server_strict_cors_builds() {
        let config = CorsConfig {
            enabled: true,
            allowed_origins: vec!["https://app.example.com".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string()],
            allowed_headers: vec!["content-type".to_string()],
        };
        let _layer = build_cors(&config);
    }
}
