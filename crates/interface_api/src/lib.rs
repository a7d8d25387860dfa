//! HTTP API Layer
//!
//! This crate provides a preview surface over the dunning engine using Axum.
//! Clients post invoice snapshots (and reminder history) and get back the
//! derived status, the next reminder, a simulated schedule or an action plan.
//! The server holds no invoice data.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for status and scheduling queries
//! - **Middleware**: Request ids, tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::config::ApiConfig;
use crate::middleware::audit_middleware;
use crate::handlers::{dunning, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `config` - API configuration (default timezone and reminder policy)
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(config: ApiConfig) -> Router {
    let state = AppState { config };

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check));

    // Dunning routes
    let dunning_routes = Router::new()
        .route("/status", post(dunning::derive_invoice_status))
        .route("/next-reminder", post(dunning::next_reminder))
        .route("/simulate", post(dunning::simulate))
        .route("/plan", post(dunning::plan));

    let api_routes = Router::new()
        .nest("/dunning", dunning_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
