//! Error types for registration and dispatch.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};

use super::CancellationError;

/// Errors raised while wiring handlers at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("a handler is already registered for command '{kind}' ({existing})")]
    DuplicateHandler { kind: String, existing: &'static str },
}

/// The outcome of a dispatch that did not succeed.
///
/// Exactly one of these (or success) is produced per dispatch call.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The request could not be turned into a command. Never reaches the bus.
    #[error("invalid command: {0}")]
    Validation(#[from] ValidationError),

    /// No handler is registered for the command kind.
    #[error("no handler registered for command '{0}'")]
    Unhandled(String),

    /// The handler ran and rejected the command.
    #[error(transparent)]
    Domain(DomainError),

    /// The handler failed unexpectedly (panic or infrastructure failure).
    #[error("internal error: {0}")]
    Internal(String),

    /// The caller's context finished before an outcome arrived.
    #[error(transparent)]
    Cancelled(#[from] CancellationError),
}

impl From<DomainError> for DispatchError {
    fn from(err: DomainError) -> Self {
        if err.code.is_infrastructure() {
            DispatchError::Internal(err.to_string())
        } else {
            DispatchError::Domain(err)
        }
    }
}

impl DispatchError {
    /// Short machine-readable name of the error category.
    pub fn category(&self) -> &'static str {
        match self {
            DispatchError::Validation(_) => "validation",
            DispatchError::Unhandled(_) => "unhandled",
            DispatchError::Domain(_) => "domain",
            DispatchError::Internal(_) => "internal",
            DispatchError::Cancelled(_) => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn business_errors_stay_domain_errors() {
        let err: DispatchError = DomainError::new(ErrorCode::Conflict, "taken").into();
        assert!(matches!(err, DispatchError::Domain(ref e) if e.code == ErrorCode::Conflict));
        assert_eq!(err.to_string(), "[CONFLICT] taken");
    }

    #[test]
    fn infrastructure_errors_become_internal() {
        let err: DispatchError = DomainError::new(ErrorCode::StorageError, "disk full").into();
        assert!(matches!(err, DispatchError::Internal(ref msg) if msg.contains("disk full")));
        assert_eq!(err.category(), "internal");
    }

    #[test]
    fn cancellation_converts() {
        let err: DispatchError = CancellationError::DeadlineExceeded.into();
        assert_eq!(err.to_string(), "deadline exceeded");
        assert_eq!(err.category(), "cancelled");
    }

    #[test]
    fn duplicate_handler_message_names_both_sides() {
        let err = RegistrationError::DuplicateHandler {
            kind: "register-with-email".into(),
            existing: "RegisterWithEmailHandler",
        };
        assert_eq!(
            err.to_string(),
            "a handler is already registered for command 'register-with-email' (RegisterWithEmailHandler)"
        );
    }
}
