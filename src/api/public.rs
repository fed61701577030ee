//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;

// Errors

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {}", self.0),
        )
            .into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub fn not_found(what: &str, id: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{} {} not found", what, id)).into_response()
}

pub fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, msg.to_string()).into_response()
}

// Re-export public types from each route

pub mod lectures {
    pub use crate::api::routes::lectures::public::*;
}

pub mod practice {
    pub use crate::api::routes::practice::public::*;
}

pub mod problems {
    pub use crate::api::routes::problems::public::*;
}

pub mod sessions {
    pub use crate::api::routes::sessions::public::*;
}
