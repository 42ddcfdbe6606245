//! Error types and error handling
//!
//! Every failure a category view can hit collapses into [`CategoryError`].
//! The HTTP mapping is intentionally terse: callers learn the status code and
//! nothing else, so a 404 for an unknown type is indistinguishable from a 404
//! for a missing record.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

/// Category administration error type
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Unregistered type, or a record id outside the type's records (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authenticated user lacks permission for the category type (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No authenticated user on the request
    #[error("Authentication required")]
    Unauthenticated {
        /// Where the user is sent to sign in
        login_url: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-database storage failure
    #[error("Store error: {0}")]
    Store(String),

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Invalid setup, such as a category type that cannot be registered
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CategoryError {
    /// Status code this error is surfaced with
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthenticated { .. } => StatusCode::SEE_OTHER,
            Self::Database(_) | Self::Store(_) | Self::Template(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated { login_url } => Redirect::to(&login_url).into_response(),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            other => {
                tracing::error!(error = %other, "Category request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Result alias used throughout the crate
pub type CategoryResult<T> = Result<T, CategoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CategoryError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CategoryError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            CategoryError::Store("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CategoryError::Config("blog.tag".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_response_hides_detail() {
        let response = CategoryError::NotFound("blog.secret".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let response = CategoryError::Unauthenticated {
            login_url: "/login".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/login");
    }
}
