//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

use crate::store::StoreError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for startup and process-level failures
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// The dataset could not be loaded; the service cannot operate without it
    #[error("Record store unavailable: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Message sent when `order_by` is outside {-1, 0, 1}
pub const ERROR_BAD_ORDER_BY: &str = "OrderBy invalid";

/// Message sent when `order_field` names no sortable field
pub const ERROR_BAD_ORDER_FIELD: &str = "OrderFeld invalid";

/// Structured error payload
///
/// Serialized as `{"Error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Failure of a single search request
///
/// Each variant maps to exactly one response shape: plain text for
/// authentication, parse and internal failures, the structured payload for
/// enum validation failures.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Missing or wrong `AccessToken` header
    #[error("invalid AccessToken")]
    Unauthorized,

    /// A numeric query parameter did not parse
    #[error("{source}")]
    InvalidParam {
        /// Parameter name
        name: &'static str,
        #[source]
        source: ParseIntError,
    },

    /// `order_by` parsed but is not a known direction
    #[error("OrderBy invalid")]
    InvalidOrderBy(i64),

    /// `order_field` is not a sortable field
    #[error("OrderFeld invalid")]
    InvalidOrderField(String),

    /// The dataset could not be read or parsed for this request
    #[error("{0}")]
    Store(#[from] StoreError),

    /// The blocking dataset load did not complete
    #[error("{0}")]
    Task(#[from] tokio::task::JoinError),

    /// The result could not be encoded
    #[error("{0}")]
    Encode(#[from] serde_json::Error),
}

impl SearchError {
    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidParam { .. } | Self::InvalidOrderBy(_) | Self::InvalidOrderField(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(_) | Self::Task(_) | Self::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Unauthorized => {
                tracing::warn!("Rejected request with bad AccessToken");
                (status, self.to_string()).into_response()
            }
            Self::InvalidParam { name, ref source } => {
                tracing::debug!(param = name, error = %source, "Invalid query parameter");
                (status, self.to_string()).into_response()
            }
            Self::InvalidOrderBy(value) => {
                tracing::debug!(order_by = value, "Invalid order_by");
                (status, Json(ErrorResponse::new(ERROR_BAD_ORDER_BY))).into_response()
            }
            Self::InvalidOrderField(ref field) => {
                tracing::debug!(order_field = %field, "Invalid order_field");
                (status, Json(ErrorResponse::new(ERROR_BAD_ORDER_FIELD))).into_response()
            }
            Self::Store(ref e) => {
                tracing::error!("Record store error: {}", e);
                (status, self.to_string()).into_response()
            }
            Self::Task(ref e) => {
                tracing::error!("Dataset load task failed: {}", e);
                (status, self.to_string()).into_response()
            }
            Self::Encode(ref e) => {
                tracing::error!("Response encode error: {}", e);
                (status, self.to_string()).into_response()
            }
        }
    }
}
