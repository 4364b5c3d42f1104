use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::ErrorResponse;
use crate::bridge::ModelError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error("API rate limit exceeded. Please wait a moment and try again, or check your API key's quota limits.")]
    QuotaExceeded,

    #[error("Failed to parse model response: {0}")]
    ResponseParse(#[from] serde_json::Error),

    #[error("An unexpected error occurred: {0}")]
    Unclassified(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::ResponseParse(_) | Self::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::QuotaExceeded(_) => Self::QuotaExceeded,
            other => Self::Unclassified(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
