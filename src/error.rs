use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures surfaced by the account, reminder and session stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("username already taken")]
    UsernameTaken,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("render error: {0}")]
    Render(#[from] tera::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Store(StoreError::UsernameTaken) => {
                (StatusCode::CONFLICT, "Username already exists").into_response()
            }
            other => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_a_bad_request() {
        let res = AppError::invalid("steps must be a whole number").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn backend_failures_hide_details() {
        let err = AppError::from(StoreError::from(anyhow::anyhow!("connection reset")));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let res = AppError::from(StoreError::UsernameTaken).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
