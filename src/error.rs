use crate::model::EntityKind;
use thiserror::Error;

/// Failures surfaced by the entity services.
///
/// Callers get these unchanged; the API layer decides how each one is
/// rendered into the response envelope.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An identifier or payload value could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The targeted row, or a row named by a reference field, is absent.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// A create targeted a composite key that already has a row.
    #[error("{kind} {id} already exists")]
    Conflict { kind: EntityKind, id: String },

    /// The persistence store failed.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn conflict(kind: EntityKind, id: impl ToString) -> Self {
        Self::Conflict {
            kind,
            id: id.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
