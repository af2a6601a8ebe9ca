use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Public message for a request that does not carry an interface definition.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Provide a TypeScript interface object.";

/// Public message for any failure between prompt and parsed fields.
pub const GENERATION_FAILURE_MESSAGE: &str = "Failed to generate fields";

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Serializes as `{ error, kind }` so the front-end gets structured error messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    GenerationFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Completion provider error: {0}")]
    Provider(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_input() -> Self {
        AppError::InvalidInput(INVALID_INPUT_MESSAGE.into())
    }

    pub fn generation_failure() -> Self {
        AppError::GenerationFailure(GENERATION_FAILURE_MESSAGE.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::GenerationFailure(_) => "generation_failure",
            AppError::NotFound(_) => "not_found",
            AppError::Provider(_) => "provider",
            AppError::Serde(_) => "serde",
            AppError::Io(_) => "io",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}

/// HTTP bodies only carry `{ error }`. Internal details stay in the logs.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::InvalidInput(msg) | AppError::GenerationFailure(msg) => msg.clone(),
            AppError::NotFound(_) => self.to_string(),
            _ => GENERATION_FAILURE_MESSAGE.to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
