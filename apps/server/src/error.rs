use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vnquant_market_data::MarketDataError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Market(#[from] MarketDataError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    // Surface the underlying error message to help debugging during development
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// The uniform failure envelope every error response carries.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
    pub timestamp: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: detail.into(),
            timestamp: iso_timestamp(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Market(e) => match e {
                MarketDataError::InvalidInput(_) | MarketDataError::Unsupported { .. } => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                MarketDataError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason.clone()),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        }
        let body = Json(ErrorBody::new(format!("HTTP {}", status.as_u16()), detail));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Local time in ISO-8601, the format the error envelope and health
/// responses advertise.
pub fn iso_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
