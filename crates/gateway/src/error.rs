//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relink_discord::{LinkError, RefreshError};
use serde_json::json;
use thiserror::Error;

use crate::util::DecodeError;

pub const INVALID_URL_MESSAGE: &str = "Invalid URL format";
pub const REFRESH_FAILED_MESSAGE: &str = "Failed to refresh URL";

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("undecodable path: {0}")]
    Decode(#[from] DecodeError),

    #[error("empty attachment url")]
    EmptyUrl,

    #[error(transparent)]
    InvalidLink(#[from] LinkError),

    #[error("refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("refreshed url is not a valid Location header: {0}")]
    InvalidLocation(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Decode(_) | GatewayError::EmptyUrl | GatewayError::InvalidLink(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Refresh(_) | GatewayError::InvalidLocation(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Text returned to the caller. Upstream causes stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Decode(_) | GatewayError::EmptyUrl => INVALID_URL_MESSAGE.to_string(),
            GatewayError::InvalidLink(error) => error.to_string(),
            GatewayError::Refresh(_) | GatewayError::InvalidLocation(_) => {
                REFRESH_FAILED_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = json!({
            "error": self.public_message(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
