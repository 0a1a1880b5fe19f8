//! The public error type. Internally we build `anyhow` context chains and, at the boundary of each
//! operation, tag them with an `ErrorType` using `IntoResult::pub_result`.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

/// The kind of failure. Every kind is fatal for the operation that raised it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Missing or unreadable configuration, or a missing data directory.
    Config,
    /// The ledger or journal content could not be understood.
    Format,
    /// A file could not be read, written or backed up.
    Io,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub(crate) fn format(message: impl Display) -> Self {
        Self::new(ErrorType::Format, anyhow::anyhow!("{message}"))
    }

    /// Wraps the error with more context, keeping its type.
    pub(crate) fn context(self, context: impl Display + Send + Sync + 'static) -> Self {
        Self {
            error_type: self.error_type,
            inner: self.inner.context(context),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.inner)
    }
}

/// Converts any error that `anyhow` understands into the public `Error` with the given type.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
