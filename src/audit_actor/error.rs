use thiserror::Error;

/// Errors that can occur while recording or reading the audit log.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuditError {
    /// Audit entries are never edited once written.
    #[error("Audit entry {0} is immutable")]
    Immutable(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for AuditError {
    fn from(msg: String) -> Self {
        AuditError::ActorCommunicationError(msg)
    }
}
