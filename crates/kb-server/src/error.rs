//! Request error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kb_site::PageError;

/// Error returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// The request path is outside the mount path.
    #[error("no route for {0}")]
    NoRoute(String),
    /// Page, asset or search failure.
    #[error(transparent)]
    Page(#[from] PageError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NoRoute(_) => StatusCode::NOT_FOUND,
            Self::Page(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Page(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(error = %self, "404");
        } else {
            tracing::error!(error = %self, "Request failed");
        }
        let body = status.canonical_reason().unwrap_or_default();
        (status, body).into_response()
    }
}
