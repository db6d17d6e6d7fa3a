use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Uniform wrapper around every response body, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub error: bool,
    pub status: u16,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            error: false,
            status: status.as_u16(),
            data: Some(data),
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
            status: status.as_u16(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// HTTP status each service failure is reported with.
pub fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Conflict { .. } => StatusCode::CONFLICT,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = match &self {
            ServiceError::Internal(e) => {
                log::error!("Store failure: {:#}", e);
                "Internal storage error".to_string()
            }
            other => other.to_string(),
        };
        Envelope::<()>::failure(status, message).into_response()
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidArgument(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ServiceError::InvalidArgument("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ServiceError::not_found(EntityKind::Curso, 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ServiceError::conflict(EntityKind::CursoTrilha, "1-2")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&ServiceError::Internal(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_failure_envelope_shape() {
        let envelope = Envelope::<()>::failure(StatusCode::NOT_FOUND, "Curso 1 not found");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"], true);
        assert_eq!(json["status"], 404);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "Curso 1 not found");
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::success(StatusCode::CREATED, "ok", vec![1, 2]);
        assert!(!envelope.error);
        assert_eq!(envelope.status, 201);
        assert_eq!(envelope.data, Some(vec![1, 2]));
    }
}
