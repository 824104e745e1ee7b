pub mod elements;
pub mod image;
pub mod topology;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;
use crate::topology::TopologyError;
use crate::visualize::VisualizeError;

/// Error response body: {"error": "message"}
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API error type
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::not_found(err.to_string()),
            // Duplicate ids are a client error, reported as 400 rather than 409
            StoreError::Conflict(_) => Self::bad_request(err.to_string()),
            StoreError::NoElementsProcessed => Self::forbidden(err.to_string()),
        }
    }
}

impl From<TopologyError> for ApiError {
    fn from(err: TopologyError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<VisualizeError> for ApiError {
    fn from(err: VisualizeError) -> Self {
        tracing::error!("Visualization failed: {}", err);
        Self::internal(err.to_string())
    }
}

/// Response helper: return 201 Created with JSON body
pub fn created<T: Serialize>(item: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(item))
}

/// Healthcheck endpoint: returns 200 OK with status
pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "topology-registry",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_status_codes() {
        assert_eq!(
            ApiError::from(StoreError::NotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::Conflict("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::NoElementsProcessed).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_topology_error_is_bad_request() {
        let err = TopologyError::PoolExhausted { requested: 9, available: 7 };
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
        let err = TopologyError::ReservedNetworkName {
            name: "10.0.0.1".into(),
            reason: "address".into(),
        };
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
    }
}
