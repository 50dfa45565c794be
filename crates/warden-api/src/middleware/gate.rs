// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request gate middleware.
//!
//! The gate runs on every request and resolves an [`AuthContext`] from the
//! `Authorization` header: bypass check, bearer extraction, token validity,
//! principal lookup, binding check. Every failure branch attaches the
//! anonymous context and forwards the request unchanged; the gate never
//! rejects. Rejection is the policy layer's job, which keeps a single
//! source of truth for what anonymous requests may do.
//!
//! Requests under a bypass prefix skip the pipeline entirely, before any
//! header parsing, so a garbage `Authorization` header cannot break an
//! open endpoint.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::Request;
use axum::response::Response;
use tower::{Layer, Service};
use tracing::debug;

use crate::context::AuthContext;
use crate::state::AppState;

/// Installs the [`GateService`] around an inner service.
#[derive(Clone)]
pub struct GateLayer {
    state: AppState,
}

impl GateLayer {
    /// Creates the layer over shared state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateService {
            inner,
            state: self.state.clone(),
        }
    }
}

/// Tower service resolving the per-request [`AuthContext`].
#[derive(Clone)]
pub struct GateService<S> {
    inner: S,
    state: AppState,
}

impl<S> Service<Request<Body>> for GateService<S>
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
            let (ctx, mut req) = resolve_context(&state, req).await;
            req.extensions_mut().insert(ctx);
            inner.call(req).await
        })
    }
}

async fn resolve_context(state: &AppState, req: Request<Body>) -> (AuthContext, Request<Body>) {
    let path = req.uri().path().to_string();
    let ip = client_ip(&req);

    let anonymous = || {
        let ctx = AuthContext::anonymous();
        match &ip {
            Some(ip) => ctx.with_client_ip(ip.clone()),
            None => ctx,
        }
    };

    if state
        .config()
        .auth
        .bypass_paths
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
    {
        return (anonymous(), req);
    }

    let Some(token) = bearer_token(&req) else {
        return (anonymous(), req);
    };

    if !state.tokens().is_valid(token) {
        debug!(path, "token failed validity check");
        return (anonymous(), req);
    }

    let subject = match state.tokens().subject(token) {
        Ok(subject) => subject,
        Err(err) => {
            debug!(path, error = %err, "token subject unreadable");
            return (anonymous(), req);
        }
    };

    let principal = match state.store().find_by_username_or_email(&subject).await {
        Ok(principal) => principal,
        Err(err) => {
            debug!(path, subject, error = %err, "principal lookup failed");
            return (anonymous(), req);
        }
    };

    if !principal.enabled {
        debug!(path, subject, "principal disabled");
        return (anonymous(), req);
    }

    if !state.tokens().is_valid_for(token, &principal) {
        debug!(path, subject, "token not bound to principal");
        return (anonymous(), req);
    }

    let ctx = AuthContext::from_principal(&principal);
    let ctx = match ip {
        Some(ip) => ctx.with_client_ip(ip),
        None => ctx,
    };
    (ctx, req)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Best-effort client IP from forwarding headers.
fn client_ip(req: &Request<Body>) -> Option<String> {
    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return Some(first.to_string());
                }
            }
        }
    }
    req.headers()
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tower::{service_fn, ServiceExt};
    use warden_core::{MemoryPrincipalStore, NewPrincipal, PrincipalStore, Role};

    async fn state_with_alice() -> (AppState, Arc<MemoryPrincipalStore>) {
        let store = Arc::new(MemoryPrincipalStore::new());
        store
            .create(NewPrincipal {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "pw".to_string(),
                name: None,
            })
            .await
            .unwrap();
        let config = ApiConfig::default().with_secret(warden_core::generate_secret());
        let state = AppState::builder(config)
            .store(store.clone())
            .build()
            .unwrap();
        (state, store)
    }

    /// Inner service reporting the resolved context through the response
    /// status: 200 for authenticated, 418 for anonymous.
    async fn probe(req: Request<Body>) -> Result<Response, std::convert::Infallible> {
        let ctx = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_default();
        let status = if ctx.is_anonymous() {
            StatusCode::IM_A_TEAPOT
        } else {
            StatusCode::OK
        };
        Ok(Response::builder().status(status).body(Body::empty()).unwrap())
    }

    async fn run(state: AppState, req: Request<Body>) -> StatusCode {
        let service = GateLayer::new(state).layer(service_fn(probe));
        service.oneshot(req).await.unwrap().status()
    }

    fn request(path: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_gate_no_header_is_anonymous() {
        let (state, _) = state_with_alice().await;
        let status = run(state, request("/api/users", None)).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_gate_valid_token_authenticates() {
        let (state, _) = state_with_alice().await;
        let alice = state
            .store()
            .find_by_username_or_email("alice")
            .await
            .unwrap();
        let token = state.tokens().issue(&alice).unwrap();
        let status = run(state, request("/api/users", Some(&format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_gate_bypass_ignores_garbage_header() {
        let (state, _) = state_with_alice().await;
        let status = run(
            state,
            request("/api/auth/login", Some("Bearer not.a.token")),
        )
        .await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_gate_garbage_token_degrades_to_anonymous() {
        let (state, _) = state_with_alice().await;
        let status = run(state, request("/api/users", Some("Bearer junk"))).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_gate_non_bearer_scheme_is_anonymous() {
        let (state, _) = state_with_alice().await;
        let status = run(state, request("/api/users", Some("Basic YWxpY2U6cHc="))).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_gate_unknown_subject_is_anonymous() {
        let (state, _) = state_with_alice().await;
        let ghost = warden_core::Principal {
            id: 99,
            username: "ghost".to_string(),
            email: "ghost@example.com".to_string(),
            name: None,
            role: Role::User,
            enabled: true,
        };
        let token = state.tokens().issue(&ghost).unwrap();
        let status = run(state, request("/api/users", Some(&format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_gate_disabled_principal_is_anonymous() {
        let (state, store) = state_with_alice().await;
        let alice = store.find_by_username_or_email("alice").await.unwrap();
        let token = state.tokens().issue(&alice).unwrap();
        store.set_enabled("alice", false).await.unwrap();
        let status = run(state, request("/api/users", Some(&format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
    }

    #[test]
    fn test_gate_bearer_extraction() {
        let req = request("/x", Some("Bearer abc"));
        assert_eq!(bearer_token(&req), Some("abc"));
        let req = request("/x", Some("bearer abc"));
        assert_eq!(bearer_token(&req), None);
        let req = request("/x", Some("Bearer "));
        assert_eq!(bearer_token(&req), None);
        let req = request("/x", None);
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_gate_client_ip_prefers_forwarded_for() {
        let req = Request::builder()
            .uri("/x")
            .header("x-forwarded-for", "10.1.1.1, 10.2.2.2")
            .header("x-real-ip", "10.3.3.3")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req).as_deref(), Some("10.1.1.1"));
    }
}
