use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error taxonomy shared by every endpoint. Internal detail never
/// reaches the client; it is logged and replaced with a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // A unique-key race (e.g. two concurrent registrations of the same
        // email) must surface as 409, not 500.
        if let sqlx::Error::Database(ref db) = e {
            if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
                return Self::Conflict("Already exists".into());
            }
        }
        Self::Internal(e.into())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        assert_eq!(
            ApiError::validation("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthenticated("no token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("not yours").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("missing").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict("duplicate").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("db exploded")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        #[derive(Debug)]
        struct DupKey;
        impl std::fmt::Display for DupKey {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("duplicate key value violates unique constraint")
            }
        }
        impl std::error::Error for DupKey {}
        impl sqlx::error::DatabaseError for DupKey {
            fn message(&self) -> &str {
                "duplicate key value violates unique constraint"
            }
            fn kind(&self) -> sqlx::error::ErrorKind {
                sqlx::error::ErrorKind::UniqueViolation
            }
            fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
                self
            }
            fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
                self
            }
            fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
                self
            }
        }

        let err: ApiError = sqlx::Error::Database(Box::new(DupKey)).into();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.status(), StatusCode::CONFLICT);

        // Anything else stays internal.
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn internal_detail_is_scrubbed_from_the_response() {
        let resp = ApiError::Internal(anyhow::anyhow!("password column leaked")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The concrete message must not surface; only the body shape is public.
        let msg = ApiError::Internal(anyhow::anyhow!("secret detail")).to_string();
        assert!(msg.contains("secret detail")); // logged form keeps detail
    }
}
