use std::path::PathBuf;

use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use log::{error, warn};
use thiserror::Error;

use crate::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("invalid image file: {0}")]
    DecodeFailure(#[from] image::ImageError),

    /// Raised by [`crate::model::OnnxModel::load`]. The server loads its model
    /// before binding, so this ends startup and a running server never answers
    /// 503 for it; the status mapping covers callers that load models later.
    #[error("model {} is unavailable: {reason}", .path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("inference failed: {0}")]
    InferenceFailure(String),

    #[error("could not access upload storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error("background task was cancelled")]
    Cancelled(#[from] BlockingError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::DecodeFailure(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InferenceFailure(_) | AppError::Storage(_) | AppError::Cancelled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("Rejected upload: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
