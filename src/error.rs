use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::session::SessionError;

/// PortalError
///
/// Failures a page handler cannot turn into a page of its own. Everything the
/// user is expected to see (wrong password, service down, rejected credential)
/// is handled inside the handlers; what reaches this type is a bug or an
/// exhausted resource.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong. Please try again later.",
        )
            .into_response()
    }
}
