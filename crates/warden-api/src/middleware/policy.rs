// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Policy enforcement middleware.
//!
//! Runs after the request gate and is the only place auth-shaped
//! rejections happen: `401` when the rule requires identity and the
//! context is anonymous, `403` when the identity's role does not satisfy
//! the rule.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use tower::{Layer, Service};
use tracing::warn;
use warden_core::AccessDecision;

use crate::context::AuthContext;
use crate::error::ApiError;
use crate::state::AppState;

/// Installs the [`AccessService`] around an inner service.
#[derive(Clone)]
pub struct AccessLayer {
    state: AppState,
}

impl AccessLayer {
    /// Creates the layer over shared state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AccessLayer {
    type Service = AccessService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessService {
            inner,
            state: self.state.clone(),
        }
    }
}

/// Tower service evaluating the access rule table per request.
#[derive(Clone)]
pub struct AccessService<S> {
    inner: S,
    state: AppState,
}

impl<S> Service<Request<Body>> for AccessService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = self.state.clone();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let ctx = req
                .extensions()
                .get::<AuthContext>()
                .cloned()
                .unwrap_or_default();
            let path = req.uri().path();
            let method = req.method().as_str();

            match state.policy().evaluate(path, method, ctx.role) {
                AccessDecision::Granted => inner.call(req).await,
                AccessDecision::Unauthenticated => {
                    warn!(path, method, "rejecting unauthenticated request");
                    Ok(ApiError::unauthorized("authentication required")
                        .to_response(Some(ctx.request_id)))
                }
                AccessDecision::Forbidden => {
                    warn!(
                        path,
                        method,
                        user = %ctx.username,
                        role = ?ctx.role,
                        "rejecting request lacking required role"
                    );
                    Ok(ApiError::forbidden("insufficient role")
                        .to_response(Some(ctx.request_id)))
                }
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use axum::http::{Method, StatusCode};
    use tower::{service_fn, ServiceExt};
    use warden_core::{Principal, Role};

    fn state() -> AppState {
        let config = ApiConfig::default().with_secret(warden_core::generate_secret());
        AppState::builder(config).build().unwrap()
    }

    async fn inner_ok(_req: Request<Body>) -> Result<Response, std::convert::Infallible> {
        Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Body::empty())
            .unwrap())
    }

    fn principal(role: Role) -> Principal {
        Principal {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            name: None,
            role,
            enabled: true,
        }
    }

    async fn run(path: &str, method: Method, ctx: Option<AuthContext>) -> StatusCode {
        let service = AccessLayer::new(state()).layer(service_fn(inner_ok));
        let mut builder = Request::builder().uri(path).method(method);
        if let Some(ctx) = ctx {
            builder = builder.extension(ctx);
        }
        let req = builder.body(Body::empty()).unwrap();
        service.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_access_anonymous_rejected_on_protected_path() {
        let status = run("/api/users", Method::GET, Some(AuthContext::anonymous())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_access_missing_context_treated_as_anonymous() {
        let status = run("/api/users", Method::GET, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_access_user_allowed_to_read() {
        let ctx = AuthContext::from_principal(&principal(Role::User));
        let status = run("/api/users", Method::GET, Some(ctx)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_access_user_forbidden_to_mutate_transactions() {
        let ctx = AuthContext::from_principal(&principal(Role::User));
        let status = run("/api/transactions", Method::POST, Some(ctx)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_access_admin_allowed_to_mutate_transactions() {
        let ctx = AuthContext::from_principal(&principal(Role::Admin));
        let status = run("/api/transactions", Method::DELETE, Some(ctx)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_access_bypass_path_open_to_anonymous() {
        let status = run("/api/health", Method::GET, Some(AuthContext::anonymous())).await;
        assert_eq!(status, StatusCode::OK);
    }
}
