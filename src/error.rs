//! Contains the `Error` and `Result` types that `mongodb-core` uses.

use std::fmt;

use thiserror::Error;

use crate::{codec, transport::RawError};

/// The error domain a transport engine uses for errors returned by the server.
pub const SERVER_ERROR_DOMAIN: u32 = 11;

/// The error domain a transport engine uses for write concern errors returned by the server.
pub const WRITE_CONCERN_ERROR_DOMAIN: u32 = 18;

/// The result type for all methods that can return an error in the `mongodb-core` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in the `mongodb-core` crate. The inner
/// [`ErrorKind`](enum.ErrorKind.html) is wrapped in a `Box` to keep the error small.
#[derive(Clone, Debug, Error)]
#[error("Kind: {kind}")]
#[non_exhaustive]
pub struct Error {
    /// The type of error that occurred.
    pub kind: Box<ErrorKind>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Error {
        ErrorKind::InvalidArgument {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn concern_append(message: impl Into<String>) -> Error {
        ErrorKind::ConcernAppend {
            message: message.into(),
        }
        .into()
    }

    /// Whether this error was reported by the transport engine.
    pub fn is_engine_error(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::Engine(_))
    }

    /// Whether this error was produced by a malformed argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::InvalidArgument { .. })
    }

    /// Gets the code from this error, if it came from the transport engine.
    pub fn code(&self) -> Option<u32> {
        match self.kind.as_ref() {
            ErrorKind::Engine(err) => Some(err.code),
            _ => None,
        }
    }
}

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        Self::new(err.into())
    }
}

impl std::ops::Deref for Error {
    type Target = ErrorKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

/// The types of errors that can occur.
#[allow(missing_docs)]
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An invalid argument was provided.
    #[error("An invalid argument was provided: {message}")]
    #[non_exhaustive]
    InvalidArgument { message: String },

    /// A document could not be decoded into the requested type.
    #[error("{0}")]
    Decoding(codec::de::Error),

    /// A value could not be encoded into BSON.
    #[error("{0}")]
    Encoding(codec::ser::Error),

    /// A read or write concern could not be appended to a document.
    #[error("Failed to append concern: {message}")]
    #[non_exhaustive]
    ConcernAppend { message: String },

    /// The transport engine reported a failure.
    #[error("Engine error {0}")]
    Engine(EngineError),
}

impl From<codec::de::Error> for ErrorKind {
    fn from(err: codec::de::Error) -> Self {
        Self::Decoding(err)
    }
}

impl From<codec::ser::Error> for ErrorKind {
    fn from(err: codec::ser::Error) -> Self {
        Self::Encoding(err)
    }
}

impl From<RawError> for ErrorKind {
    fn from(err: RawError) -> Self {
        Self::Engine(EngineError::parse(err))
    }
}

/// An error reported by the transport engine, carried verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct EngineError {
    /// The error domain reported by the engine.
    pub domain: u32,

    /// The error code reported by the engine.
    pub code: u32,

    /// A description of the error that occurred.
    pub message: String,
}

impl EngineError {
    fn parse(raw: RawError) -> Self {
        Self {
            domain: raw.domain,
            code: raw.code,
            message: raw.message,
        }
    }

    /// Whether the error was returned by the server rather than raised by the engine itself.
    pub fn is_server_error(&self) -> bool {
        self.domain == SERVER_ERROR_DOMAIN || self.domain == WRITE_CONCERN_ERROR_DOMAIN
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(domain {}, code {}): {}",
            self.domain, self.code, self.message
        )
    }
}
