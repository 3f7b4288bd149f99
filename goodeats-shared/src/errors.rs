use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Session errors
/// - E2xxx: Events and RSVP ledger errors
/// - E3xxx: Social (profiles, feed, friends) errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    BackendUnavailable,
    BadRequest,

    // Session (E1xxx)
    AuthenticationRequired,
    TokenExpired,
    TokenInvalid,

    // Events (E2xxx)
    EventNotFound,
    RsvpNotFound,
    InvalidRsvpStatus,
    InvalidGuestCount,
    EventFull,
    NotEventHost,

    // Social (E3xxx)
    UserNotFound,
    UsernameTaken,
    InvalidUsername,
    PostNotFound,
    FriendshipNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::BackendUnavailable => "E0005",
            Self::BadRequest => "E0006",

            // Session
            Self::AuthenticationRequired => "E1001",
            Self::TokenExpired => "E1002",
            Self::TokenInvalid => "E1003",

            // Events
            Self::EventNotFound => "E2001",
            Self::RsvpNotFound => "E2002",
            Self::InvalidRsvpStatus => "E2003",
            Self::InvalidGuestCount => "E2004",
            Self::EventFull => "E2005",
            Self::NotEventHost => "E2006",

            // Social
            Self::UserNotFound => "E3001",
            Self::UsernameTaken => "E3002",
            Self::InvalidUsername => "E3003",
            Self::PostNotFound => "E3004",
            Self::FriendshipNotFound => "E3005",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ValidationError | Self::BadRequest | Self::InvalidRsvpStatus
            | Self::InvalidGuestCount | Self::InvalidUsername => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::EventNotFound | Self::RsvpNotFound
            | Self::UserNotFound | Self::PostNotFound | Self::FriendshipNotFound => StatusCode::NOT_FOUND,
            Self::AuthenticationRequired | Self::TokenExpired | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::NotEventHost => StatusCode::FORBIDDEN,
            Self::EventFull | Self::UsernameTaken => StatusCode::CONFLICT,
        }
    }

    /// Validation-class codes: the caller sent something malformed.
    pub fn is_validation(&self) -> bool {
        self.status_code() == StatusCode::BAD_REQUEST
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthenticationRequired, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The backend could not be reached (pool exhausted, connection refused).
    pub fn backend_unavailable(err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "backend unavailable");
        Self::new(ErrorCode::BackendUnavailable, "backend unavailable, please retry")
    }

    /// The error code this error would be rendered with.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Known { code, .. } => *code,
            AppError::Internal(_) => ErrorCode::InternalError,
            AppError::Database(err) => database_code(err),
            AppError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

/// Lost connections are a backend outage, not a bug in the query.
fn database_code(err: &diesel::result::Error) -> ErrorCode {
    use diesel::result::{DatabaseErrorKind, Error};

    match err {
        Error::NotFound => ErrorCode::NotFound,
        Error::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | Error::DatabaseError(DatabaseErrorKind::UnableToSendCommand, _) => ErrorCode::BackendUnavailable,
        _ => ErrorCode::InternalError,
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                let code = database_code(err);
                let message = match code {
                    ErrorCode::NotFound => "resource not found",
                    ErrorCode::BackendUnavailable => "backend unavailable, please retry",
                    _ => "database error",
                };
                (code.status_code(), ApiErrorResponse::new(code.code(), message))
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("E0002", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
