use crate::core::{
    AverageResult, ConversionResult, HistoricalRate, RequestRecord, SupportedCurrencySet,
};
use crate::server::AppState;
use crate::server::error::{ApiError, ApiResult};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub amount: i64,
    pub from_currency: String,
    pub to_currency: String,
}

#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub from_currency: String,
    pub to_currency: String,
}

#[derive(Debug, Deserialize)]
pub struct AverageQuery {
    pub from_currency: String,
    pub to_currency: String,
    pub duration: u32,
}

pub async fn currencies(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SupportedCurrencySet>> {
    Ok(Json(state.converter.currencies().await?))
}

pub async fn convert(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ConvertQuery>, QueryRejection>,
) -> ApiResult<Json<ConversionResult>> {
    let Query(query) = query.map_err(ApiError::from)?;
    let result = state
        .converter
        .convert(&query.from_currency, &query.to_currency, query.amount)
        .await?;
    Ok(Json(result))
}

pub async fn historical_rates(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PairQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<HistoricalRate>>> {
    let Query(query) = query.map_err(ApiError::from)?;
    let history = state
        .converter
        .historical_rates(&query.from_currency, &query.to_currency)
        .await?;
    Ok(Json(history))
}

pub async fn average(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AverageQuery>, QueryRejection>,
) -> ApiResult<Json<AverageResult>> {
    let Query(query) = query.map_err(ApiError::from)?;
    let result = state
        .converter
        .average(&query.from_currency, &query.to_currency, query.duration)
        .await?;
    Ok(Json(result))
}

pub async fn requests(State(state): State<Arc<AppState>>) -> Json<Vec<RequestRecord>> {
    Json(state.converter.recent_requests().await)
}
