use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use validator::ValidationErrors;

/// Errors surfaced by services and handlers.
///
/// Handlers never catch these; `ResponseError` turns them into the status code
/// and `{"error": ...}` body the client sees.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "{}", _0)]
    Unauthorized(String),

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "Internal Server Error")]
    Internal,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(resource: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} with ID {} not found", resource, id))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::Conflict("Record already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::Conflict(
                    "Operation violates a reference between records".to_string(),
                );
            }
        }

        tracing::error!(error = %e, "Database error");
        AppError::Internal
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}
