use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use horn_core::model::ModelError;
use horn_core::repository::StoreError;
use horn_inquiry::export::ImportError;
use horn_inquiry::wizard::WizardError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    /// Storage problems are surfaced with their cause so an operator can
    /// see a corrupt slot instead of a generic 500.
    Storage(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::PassengerNotFound(_) => AppError::NotFound(err.to_string()),
            ModelError::InvalidStatusTransition { .. } => AppError::Conflict(err.to_string()),
            ModelError::NoAdults | ModelError::LastPassenger => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::InvalidTransition { .. } | WizardError::Locked(_) => {
                AppError::Conflict(err.to_string())
            }
            WizardError::Model(model) => model.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::Corrupted(_) => AppError::Storage(err.to_string()),
            StoreError::Io(_) | StoreError::Serialization(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
