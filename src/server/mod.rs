//! HTTP surface: routes, API-key check and error mapping.

pub mod auth;
pub mod error;
pub mod handlers;

use crate::core::config::AppConfig;
use crate::core::{Converter, RateSource, RequestLog};
use crate::providers::WiseClient;
use axum::{Router, middleware, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub converter: Converter,
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(source: Arc<dyn RateSource>, config: &AppConfig) -> Self {
        let converter = Converter::new(source, RequestLog::new(config.request_log_capacity))
            .with_membership_check(config.validate_membership);
        Self {
            converter,
            api_key: config.api_key.clone(),
        }
    }
}

/// Builds the state backed by the Wise upstream described in `config`.
pub fn build_state(config: &AppConfig) -> anyhow::Result<Arc<AppState>> {
    let client = WiseClient::new(&config.providers.wise)?;
    Ok(Arc::new(AppState::new(Arc::new(client), config)))
}

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/currencies", get(handlers::currencies))
        .route("/convert", get(handlers::convert))
        .route("/historical_rates", get(handlers::historical_rates))
        .route("/average", get(handlers::average))
        .route("/requests", get(handlers::requests))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
