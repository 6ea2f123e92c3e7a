use crate::io::IoError;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

/// Everything a viewer request can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("no mesh with id {0}")]
    NotFound(Uuid),
    #[error("the upload has no `file` field")]
    MissingFile,
    #[error("{0:?} is not an .stl file")]
    UnsupportedFile(String),
    #[error("not a valid STL file: {0}")]
    InvalidStl(#[from] IoError),
    #[error("invalid viewer configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid request body: {}", .0.body_text())]
    InvalidJson(#[from] JsonRejection),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ViewerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ViewerError::NotFound(_) => StatusCode::NOT_FOUND,
            ViewerError::MissingFile => StatusCode::BAD_REQUEST,
            ViewerError::UnsupportedFile(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ViewerError::InvalidStl(_) | ViewerError::InvalidConfig(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            },
            ViewerError::InvalidJson(e) => e.status(),
            // carries 413 when the body limit was hit
            ViewerError::Multipart(e) => e.status(),
            ViewerError::Storage(_) | ViewerError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ViewerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
