// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared fixtures for the integration suites.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use warden_api::{ApiConfig, ApiServer, AppState};
use warden_core::{MemoryPrincipalStore, NewPrincipal, Role};

/// Seeded regular user.
pub const ALICE: &str = "alice";
/// Alice's password.
pub const ALICE_PASSWORD: &str = "alice-password";
/// Seeded administrator.
pub const ROOT: &str = "root";
/// Root's password.
pub const ROOT_PASSWORD: &str = "root-password";
/// Seeded disabled account.
pub const DAVE: &str = "dave";
/// Dave's password.
pub const DAVE_PASSWORD: &str = "dave-password";

/// Builds a store holding a user, an admin and a disabled account.
pub async fn seeded_store() -> Arc<MemoryPrincipalStore> {
    let store = MemoryPrincipalStore::new();
    store
        .create_with_role(
            NewPrincipal {
                username: ALICE.to_string(),
                email: "alice@example.com".to_string(),
                password: ALICE_PASSWORD.to_string(),
                name: Some("Alice Kim".to_string()),
            },
            Role::User,
        )
        .await
        .expect("seed alice");
    store
        .create_with_role(
            NewPrincipal {
                username: ROOT.to_string(),
                email: "root@example.com".to_string(),
                password: ROOT_PASSWORD.to_string(),
                name: None,
            },
            Role::Admin,
        )
        .await
        .expect("seed root");
    store
        .create_with_role(
            NewPrincipal {
                username: DAVE.to_string(),
                email: "dave@example.com".to_string(),
                password: DAVE_PASSWORD.to_string(),
                name: None,
            },
            Role::User,
        )
        .await
        .expect("seed dave");
    store.set_enabled(DAVE, false).await.expect("disable dave");
    Arc::new(store)
}

/// Builds app state over the seeded store with an explicit token ttl.
pub async fn state_with_ttl(ttl_ms: i64) -> AppState {
    let config = ApiConfig::default()
        .with_secret(warden_core::generate_secret())
        .with_token_ttl_ms(ttl_ms);
    AppState::builder(config)
        .store(seeded_store().await)
        .build()
        .expect("build state")
}

/// Builds app state over the seeded store with a one-hour ttl.
pub async fn state() -> AppState {
    state_with_ttl(3_600_000).await
}

/// Builds the full router with demo resource routes mounted, matching the
/// stock policy's protected prefixes.
pub fn router(state: AppState) -> Router {
    ApiServer::new(state).router_with_resources(demo_resources())
}

fn demo_resources() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route(
            "/api/transactions",
            get(list_transactions).post(create_transaction),
        )
}

async fn list_users() -> Json<Value> {
    Json(json!({ "users": [] }))
}

async fn list_transactions() -> Json<Value> {
    Json(json!({ "transactions": [] }))
}

async fn create_transaction() -> Json<Value> {
    Json(json!({ "created": true }))
}

/// Sends a request without a body and returns status plus parsed JSON.
pub async fn send(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    dispatch(router, method, path, token, None).await
}

/// Sends a JSON body and returns status plus parsed JSON.
pub async fn send_json(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    dispatch(router, method, path, token, Some(body)).await
}

async fn dispatch(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router call");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Logs in through the API and returns the issued token.
pub async fn login(router: &Router, identifier: &str, password: &str) -> String {
    let (status, body) = send_json(
        router,
        Method::POST,
        "/api/auth/login",
        None,
        json!({ "username_or_email": identifier, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}
