use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pantry::PantryError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("No valid barcode or expiration date found in image")]
    UnreadableLabel,

    #[error("Error processing barcode upload.")]
    UploadFailed(#[source] PantryError),

    #[error("Internal error: {0}")]
    InternalError(#[from] PantryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload | AppError::UnreadableLabel => StatusCode::BAD_REQUEST,
            AppError::UploadFailed(ref e) => {
                error!("Error uploading barcode: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InternalError(ref e) => {
                error!("Internal error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
