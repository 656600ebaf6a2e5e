#![allow(dead_code)]

use std::str::FromStr;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use comanda_api::{
    build_router,
    config::{AppConfig, StorageBackend},
    AppState,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Storage behind a [`TestApp`]
#[derive(Clone, Copy, Debug)]
pub enum Backend {
    Memory,
    Sqlite,
}

/// Helper harness driving the full router, middleware included
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// In-memory storage
    pub async fn new() -> Self {
        Self::with_backend(Backend::Memory).await
    }

    /// Fresh store per call; the SQLite variant is an in-memory database migrated on open.
    pub async fn with_backend(backend: Backend) -> Self {
        let storage = match backend {
            Backend::Memory => StorageBackend::Memory,
            Backend::Sqlite => StorageBackend::Database,
        };
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            storage,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        let state = AppState::from_config(cfg)
            .await
            .expect("failed to build test application state");
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Router over an already assembled state
    pub fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Status and parsed JSON body (`Null` for empty bodies)
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        self.request(Method::DELETE, uri, None).await.status()
    }

    /// POST that must answer 201; returns the created record
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, value) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {value}");
        value
    }

    pub async fn create_group(&self, name: &str) -> i64 {
        id_of(&self.create("/api/grupos", json!({ "name": name })).await)
    }

    pub async fn create_menu_item(&self, name: &str, price: &str) -> i64 {
        id_of(
            &self
                .create("/api/produtos", json!({ "name": name, "price": price }))
                .await,
        )
    }

    pub async fn create_table(&self, number: i64) -> i64 {
        id_of(&self.create("/api/mesas", json!({ "number": number })).await)
    }

    pub async fn create_client(&self, name: &str) -> i64 {
        id_of(
            &self
                .create(
                    "/api/clientes",
                    json!({ "name": name, "phone": "11 99999-0000", "address": "Rua A, 10" }),
                )
                .await,
        )
    }

    pub async fn create_stock_item(&self, name: &str, initial: &str, minimum: &str) -> i64 {
        id_of(
            &self
                .create(
                    "/api/estoque",
                    json!({
                        "name": name,
                        "unit": "kg",
                        "initial_quantity": initial,
                        "minimum_quantity": minimum,
                        "unit_cost": "10.00"
                    }),
                )
                .await,
        )
    }

    /// Table order with the given `(menu_item_id, quantity)` lines
    pub async fn open_table_order(&self, table_id: i64, lines: &[(i64, i64)]) -> Value {
        let items: Vec<Value> = lines
            .iter()
            .map(|(menu_item_id, quantity)| json!({ "menu_item_id": menu_item_id, "quantity": quantity }))
            .collect();
        self.create(
            "/api/pedidos",
            json!({ "kind": "mesa", "table_id": table_id, "items": items }),
        )
        .await
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json response")
}

pub fn id_of(value: &Value) -> i64 {
    value["id"]
        .as_i64()
        .unwrap_or_else(|| panic!("record without id: {value}"))
}

/// Decimal from a JSON string or number, rounded to `dp` places.
/// SQLite keeps decimals as REAL, so exact scale is not preserved.
pub fn decimal(value: &Value, dp: u32) -> Decimal {
    let parsed = match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("not a decimal: {other}"),
    };
    parsed.round_dp(dp)
}

pub fn money(value: &Value) -> Decimal {
    decimal(value, 2)
}

pub fn quantity(value: &Value) -> Decimal {
    decimal(value, 3)
}
