// HTTP error mapping for JSON responses
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Uploaded file is not an image")]
    UnsupportedMedia { mime: String },
    #[error("missing multipart field: {0}")]
    MissingField(&'static str),
    #[error("invalid multipart body: {0}")]
    Multipart(String),
    #[error("could not decode image: {0}")]
    UndecodableImage(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedMedia { .. }
            | ApiError::MissingField(_)
            | ApiError::Multipart(_)
            | ApiError::UndecodableImage(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::UnsupportedMedia { .. } => "unsupported_media",
            ApiError::MissingField(_) => "missing_field",
            ApiError::Multipart(_) => "invalid_multipart",
            ApiError::UndecodableImage(_) => "undecodable_image",
            ApiError::Validation(_) => "validation_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(e) => tracing::error!("Request failed: {:#}", e),
            ApiError::UnsupportedMedia { mime } => {
                tracing::warn!("Rejected upload with content type {}", mime)
            }
            other => tracing::debug!("Rejected request: {}", other),
        }
        json_error(self.status(), self.code(), self.to_string())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_media_is_bad_request() {
        let response = ApiError::UnsupportedMedia {
            mime: "text/plain".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "unsupported_media");
        assert_eq!(json["message"], "Uploaded file is not an image");
    }

    #[test]
    fn test_internal_is_server_error() {
        let err = ApiError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "boom");
    }
}
