//! The public error type returned by command handlers and the `Session`.
//!
//! Internally the crate propagates `anyhow::Error` with context. At the boundary where an
//! operation is initiated the error is classified with an `ErrorType` so that callers can tell a
//! failed load from a rejected form or a failed mutation.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The result type returned by the public API of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies a failure by the kind of operation that produced it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Fetching the transaction set from the store failed.
    Load,
    /// A submitted form is missing required fields or holds unparseable values. No store call was
    /// made.
    Validation,
    /// A record has no recognizable identifier, or no record matches a requested identifier. No
    /// store call was made.
    IdentifierNotFound,
    /// A create, update or delete request failed.
    Mutation,
    /// The ledger home directory or its configuration file is missing or invalid.
    Config,
    /// The request itself was malformed, e.g. a bad command-line argument.
    Request,
    /// Anything else.
    Internal,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error along with the `ErrorType` that classifies it.
pub struct Error {
    error_type: ErrorType,
    source: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, source: anyhow::Error) -> Self {
        Self { error_type, source }
    }

    /// Creates an error from a plain message.
    pub fn msg<M>(error_type: ErrorType, message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self::new(error_type, anyhow::Error::msg(message))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The alternate form prints the whole context chain on one line.
        write!(f, "{:#}", self.source)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("error_type", &self.error_type)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<anyhow::Error> for Error {
    fn from(source: anyhow::Error) -> Self {
        Self::new(ErrorType::Internal, source)
    }
}

/// Converts an internal `anyhow::Result` into the public `Result` with the given classification.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for std::result::Result<T, anyhow::Error> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pub_result_classifies() {
        let r: anyhow::Result<()> = Err(anyhow::anyhow!("boom"));
        let e = r.pub_result(ErrorType::Mutation).unwrap_err();
        assert_eq!(e.error_type(), ErrorType::Mutation);
        assert_eq!(e.to_string(), "boom");
    }

    #[test]
    fn test_display_includes_context_chain() {
        let r: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));
        let e = r
            .context("Failed to load transactions")
            .pub_result(ErrorType::Load)
            .unwrap_err();
        assert_eq!(
            e.to_string(),
            "Failed to load transactions: connection refused"
        );
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let e: Error = anyhow::anyhow!("x").into();
        assert_eq!(e.error_type(), ErrorType::Internal);
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(
            ErrorType::IdentifierNotFound.to_string(),
            "identifier_not_found"
        );
    }
}
