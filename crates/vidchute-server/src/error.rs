//! Plain-text error responses for the page handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Status plus a short plain-text body. The texts are the user surface;
/// diagnostic detail stays in the log.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: &'static str,
}

impl PageError {
    /// Submitted URL failed the acceptance filter.
    pub fn invalid_url() -> Self {
        PageError {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid YouTube URL!",
        }
    }

    /// The fetch tool did not produce an artifact.
    pub fn fetch_failed() -> Self {
        PageError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Download failed—check the URL or try again.",
        }
    }

    /// No such artifact (or a name that is not even a plain file name).
    pub fn not_found() -> Self {
        PageError {
            status: StatusCode::NOT_FOUND,
            message: "Not Found",
        }
    }

    /// Artifact exists but could not be served.
    pub fn internal() -> Self {
        PageError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal Server Error",
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}
