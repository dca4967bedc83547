use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use wayfare_core::DomainError;

#[derive(Debug)]
pub enum AppError {
    Domain(DomainError),
    Internal(anyhow::Error),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Domain(err) => {
                let status = match &err {
                    DomainError::NotFound(_) | DomainError::PackageUnavailable => {
                        StatusCode::NOT_FOUND
                    }
                    DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
                    DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    DomainError::CapacityExceeded { .. }
                    | DomainError::InvalidStateTransition { .. }
                    | DomainError::AlreadyConfirmed => StatusCode::CONFLICT,
                    DomainError::Dependency(_) => StatusCode::BAD_GATEWAY,
                };

                let mut body = json!({
                    "error": err.to_string(),
                    "code": err.code(),
                });
                if let DomainError::CapacityExceeded { remaining } = &err {
                    body["remaining_capacity"] = json!(remaining);
                }
                if let DomainError::Dependency(source) = &err {
                    // Internal detail stays in the logs.
                    tracing::error!("dependency failure: {source}");
                    body["error"] = json!("A backing service failed; the operation may need reconciliation");
                }

                (status, Json(body)).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal Server Error",
                        "code": "INTERNAL",
                    })),
                )
                    .into_response()
            }
        }
    }
}
