//! Errores de persistencia.
//! Mapea errores de Diesel / conexión a variantes semánticas, y de ahí al
//! `StoreError` que expone el contrato del core.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use scheme_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("not null violation: {0}")]
    NotNullViolation(String),
    #[error("not found")]
    NotFound,
    #[error("database busy/locked (retryable): {0}")]
    Busy(String),
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(message),
                    DatabaseErrorKind::CheckViolation => Self::CheckViolation(message),
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(message),
                    DatabaseErrorKind::NotNullViolation => Self::NotNullViolation(message),
                    // SQLITE_BUSY / SQLITE_LOCKED llegan sin kind específico
                    _ if message.contains("database is locked")
                        || message.contains("database table is locked") => Self::Busy(message),
                    other => Self::Unknown(format!("db error kind {:?}: {}", other, message)),
                }
            }
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::DeserializationError(e) => Self::Unknown(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::QueryBuilderError(e) => Self::Unknown(format!("query builder: {e}")),
            DieselError::AlreadyInTransaction => Self::Unknown("already in transaction".into()),
            DieselError::NotInTransaction => Self::Unknown("not in transaction".into()),
            DieselError::RollbackTransaction => Self::Unknown("rollback transaction".into()),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::UniqueViolation(m)
            | PersistenceError::CheckViolation(m)
            | PersistenceError::ForeignKeyViolation(m)
            | PersistenceError::NotNullViolation(m) => StoreError::Constraint(m),
            PersistenceError::Busy(m) | PersistenceError::TransientIo(m) => StoreError::Unavailable(m),
            PersistenceError::NotFound => StoreError::Internal("row not found".into()),
            PersistenceError::Unknown(m) => StoreError::Internal(m),
        }
    }
}
