//! The narrow interface through which commands are handed to the storage/transport engine.

use crate::{bson::Document, selection_criteria::ReadPreference};

/// The raw error structure a transport engine reports when a call fails.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawError {
    /// The error domain, e.g. [`SERVER_ERROR_DOMAIN`](crate::error::SERVER_ERROR_DOMAIN).
    pub domain: u32,

    /// The error code within the domain.
    pub code: u32,

    /// A description of the error.
    pub message: String,
}

impl RawError {
    /// Creates a new `RawError`.
    pub fn new(domain: u32, code: u32, message: impl Into<String>) -> Self {
        Self {
            domain,
            code,
            message: message.into(),
        }
    }
}

/// A lower-level engine that executes commands against a deployment.
///
/// The engine owns connection management, server selection and the canonical binary encoding of
/// documents; implementations receive fully composed documents by reference and are responsible
/// for enforcing `maxTimeMS`.
pub trait TransportEngine: Send + Sync {
    /// Counts the documents matching `filter`.
    ///
    /// `skip` and `limit` are positional bounds; `0` means "not set". A negative return value is a
    /// failure sentinel for engines that cannot report error details.
    fn count(
        &self,
        filter: &Document,
        skip: i64,
        limit: i64,
        options: Option<&Document>,
        read_preference: Option<&ReadPreference>,
    ) -> std::result::Result<i64, RawError>;
}
