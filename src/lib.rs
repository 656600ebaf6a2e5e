//! Comanda API Library
//!
//! Restaurant point-of-sale backend: menu catalogue, dining tables, orders,
//! stock movements, clients, suppliers and sales reports over a REST API.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod storage;
pub mod tracing;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use crate::{
    config::{AppConfig, StorageBackend},
    errors::ServiceError,
    services::AppServices,
    storage::{DbStorage, MemStorage, Storage},
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn Storage>,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Arc<dyn Storage>) -> Self {
        let services = AppServices::new(storage.clone(), config.report_top_items_limit);
        Self {
            config: Arc::new(config),
            storage,
            services,
        }
    }

    /// Opens the configured backend, migrating and seeding as configured
    pub async fn from_config(config: AppConfig) -> Result<Self, ServiceError> {
        let storage: Arc<dyn Storage> = match config.storage_backend {
            StorageBackend::Memory => {
                ::tracing::info!("Using in-memory storage; data is lost on restart");
                Arc::new(MemStorage::new())
            }
            StorageBackend::Database => {
                let pool = db::establish_connection_from_app_config(&config).await?;
                if config.auto_migrate {
                    db::run_migrations(&pool).await?;
                }
                Arc::new(DbStorage::new(Arc::new(pool)))
            }
        };

        if config.seed_demo_data && storage::seed::seed_demo_data(storage.as_ref()).await? {
            ::tracing::info!("Seeded demo catalogue and tables");
        }

        Ok(Self::new(config, storage))
    }
}

/// Every resource router, mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/grupos", handlers::groups::groups_routes())
        .nest("/produtos", handlers::menu_items::menu_items_routes())
        .nest("/clientes", handlers::clients::clients_routes())
        .nest("/mesas", handlers::tables::tables_routes())
        .nest("/fornecedores", handlers::suppliers::suppliers_routes())
        .nest("/estoque", handlers::stock::stock_routes())
        .nest("/movimentacoes", handlers::stock::movements_routes())
        .nest("/pedidos", handlers::orders::orders_routes())
        .nest("/relatorios", handlers::reports::reports_routes())
}

/// CORS from configured origins, or permissive where the configuration allows it.
/// Without either, cross-origin requests are simply not granted.
pub fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true");
        CorsLayer::new()
    }
}

/// Full application: API, health probes, OpenAPI document and middleware
pub fn build_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;
    let cors = cors_layer(&state.config);

    Router::<AppState>::new()
        .route("/", get(|| async { "comanda-api up" }))
        .nest("/health", handlers::health::health_routes())
        .nest("/api", api_routes())
        .merge(openapi::openapi_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
