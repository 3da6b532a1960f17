//! Client-side invocation errors and retry policy.

use icegen_core::OperationMode;

use crate::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection refused")]
    ConnectionRefused,
    #[error("connection lost")]
    ConnectionLost,
    #[error("invocation timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

/// A transport failure wrapped by the marshaled delegate.
///
/// The delegate never decides whether to retry; it records whether the
/// operation's mode allows it and lets the proxy layer act on that.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source}")]
pub struct NonRepeatable {
    #[source]
    pub source: TransportError,
    pub retry_eligible: bool,
}

impl NonRepeatable {
    pub fn wrap(source: TransportError, mode: OperationMode) -> Self {
        Self {
            source,
            retry_eligible: mode.is_retry_safe(),
        }
    }
}

/// Outcome categories of a failed invocation, kept distinct for callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvocationError<E> {
    #[error("user exception: {0}")]
    User(E),

    #[error("unknown user exception `{type_id}`")]
    UnknownUser { type_id: String },

    #[error("transport failure: {0}")]
    Transport(NonRepeatable),

    #[error("operation `{operation}` does not exist")]
    OperationNotExist { operation: String },

    #[error("operation `{operation}` cannot be invoked collocated")]
    CollocationUnsupported { operation: String },

    #[error("decode failure: {0}")]
    Decode(#[from] DecodeError),
}

impl<E> InvocationError<E> {
    pub fn is_retry_eligible(&self) -> bool {
        matches!(self, InvocationError::Transport(nr) if nr.retry_eligible)
    }
}

/// Run `attempt`, retrying transport failures that are retry-eligible.
pub fn invoke_with_retry<T, E, F>(max_retries: usize, mut attempt: F) -> Result<T, InvocationError<E>>
where
    F: FnMut() -> Result<T, InvocationError<E>>,
{
    let mut retries = 0;
    loop {
        match attempt() {
            Err(err) if err.is_retry_eligible() && retries < max_retries => {
                retries += 1;
                tracing::debug!(retries, "retrying after transport failure");
            }
            other => return other,
        }
    }
}
