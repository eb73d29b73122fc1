//! HTTP API layer
//!
//! REST API for the rice mill ledgers using Axum.
//!
//! - **Handlers**: party ledgers, cash reports, entry writes, health
//! - **DTOs**: request parsing and the `{ success, data, message }` envelope
//! - **Middleware**: request ids, tracing, audit logging
//! - **Error Handling**: ledger errors mapped to HTTP status codes
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use interface_api::{config::ApiConfig, create_router};
//! use infra_db::PostgresLedgerAdapter;
//!
//! let app = create_router(Arc::new(PostgresLedgerAdapter::new(pool)), ApiConfig::default());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    http::HeaderName,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_ledger::{LedgerPort, LedgerService, RequestGenerations};

use crate::config::ApiConfig;
use crate::handlers::{health, ledger, reports, REQUEST_ID_HEADER};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: LedgerService<dyn LedgerPort>,
    pub config: ApiConfig,
    pub generations: Arc<RequestGenerations>,
}

impl AppState {
    pub fn new(port: Arc<dyn LedgerPort>, config: ApiConfig) -> Self {
        Self {
            ledger: LedgerService::new(port, config.currency),
            config,
            generations: Arc::new(RequestGenerations::new()),
        }
    }
}

/// Creates the main API router
pub fn create_router(port: Arc<dyn LedgerPort>, config: ApiConfig) -> Router {
    router(AppState::new(port, config))
}

/// Builds the router around an existing state
pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let api_routes = Router::new()
        .route("/sales/ledger", get(ledger::sales_ledger))
        .route("/purchase/rice/ledger", get(ledger::rice_purchase_ledger))
        .route("/reports/daily", get(reports::daily_report))
        .route(
            "/reports/financial-statement",
            get(reports::financial_statement),
        )
        .route("/ledger/entries", post(ledger::record_entry))
        .route("/ledger/entries/:id", put(ledger::amend_entry))
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
