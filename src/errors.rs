use axum::Json;
use axum::http::StatusCode;
use serde_json::json;

/// Wire shape of a failure. Upload failures carry a `detail` field, analysis
/// failures carry `status`/`message`, everything else is plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    Plain,
    UploadDetail,
    AnalysisStatus,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub shape: ErrorShape,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            shape: ErrorShape::Plain,
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
            shape: ErrorShape::Plain,
        }
    }

    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            shape: ErrorShape::UploadDetail,
        }
    }

    pub fn analysis_failed(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            shape: ErrorShape::AnalysisStatus,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self.shape {
            ErrorShape::Plain => (self.status, self.message).into_response(),
            ErrorShape::UploadDetail => {
                (self.status, Json(json!({ "detail": self.message }))).into_response()
            }
            ErrorShape::AnalysisStatus => (
                self.status,
                Json(json!({ "status": "error", "message": self.message })),
            )
                .into_response(),
        }
    }
}
