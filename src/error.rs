use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("unauthorized access")]
    Unauthorized,

    #[error("{message}")]
    NotFound { message: String },

    #[error(" already selected ")]
    DuplicateSelection,

    #[error("{message}")]
    BadRequest { message: String },

    // Payment gateway errors
    #[error("Payment gateway error: {message}")]
    Gateway { message: String },

    // State errors
    #[error("Failed to load state from '{path}': {source}")]
    StateLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse state file '{path}': {source}")]
    StateParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save state to '{path}': {source}")]
    StateSave {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn class_not_found() -> Self {
        AppError::NotFound {
            message: "Class not found".to_string(),
        }
    }

    pub fn user_not_found() -> Self {
        AppError::NotFound {
            message: "User not found".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateSelection | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::StateLoad { .. }
            | AppError::StateParse { .. }
            | AppError::StateSave { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope shared by every handler
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Gateway { .. } => {
                tracing::error!("{}", self);
                "payment gateway error".to_string()
            }
            _ if status.is_server_error() => {
                tracing::error!("{:?}", self);
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                error: true,
                message,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Gateway {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
