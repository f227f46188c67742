use thiserror::Error;

use crate::response::Response;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("executor not found: {0}")]
    ExecutorNotFound(String),

    #[error("executor already registered: {0}")]
    Duplicate(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ApiError> for Response {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidRequest(msg) => Response::make_failure(400, msg),
            ApiError::ExecutorNotFound(_) => Response::make_not_found(),
            ApiError::Duplicate(msg) => Response::make_failure(409, msg),
            ApiError::Internal(msg) => Response::make_failure(500, format!("internal error: {msg}")),
            ApiError::Serialize(e) => {
                Response::make_failure(500, format!("serialization error: {e}"))
            }
        }
    }
}
