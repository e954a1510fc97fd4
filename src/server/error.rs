use crate::core::error::{ConverterError, ErrorKind};
use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access forbidden")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Converter(#[from] ConverterError),
}

#[derive(Serialize)]
struct ErrorBody {
    error_type: ErrorKind,
    details: String,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Forbidden => ErrorKind::Forbidden,
            ApiError::BadRequest(_) => ErrorKind::BadRequest,
            ApiError::Converter(e) => e.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::BadRequest | ErrorKind::InvalidCurrency => StatusCode::BAD_REQUEST,
            ErrorKind::UpstreamError | ErrorKind::ParseError | ErrorKind::AggregationError => {
                StatusCode::FAILED_DEPENDENCY
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::FAILED_DEPENDENCY {
            tracing::warn!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        let body = Json(ErrorBody {
            error_type: self.kind(),
            details: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::BadRequest("amount".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ConverterError::InvalidCurrency("us".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ConverterError::Upstream("timeout".into())).status(),
            StatusCode::FAILED_DEPENDENCY
        );
        assert_eq!(
            ApiError::from(ConverterError::Parse("no codes".into())).status(),
            StatusCode::FAILED_DEPENDENCY
        );
        assert_eq!(
            ApiError::from(ConverterError::Aggregation("empty".into())).status(),
            StatusCode::FAILED_DEPENDENCY
        );
    }

    #[test]
    fn test_converter_message_passes_through() {
        let err = ApiError::from(ConverterError::InvalidCurrency("USDD".into()));
        assert_eq!(err.to_string(), "Invalid currency: USDD");
        assert_eq!(err.kind(), ErrorKind::InvalidCurrency);
    }
}
