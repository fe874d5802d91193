pub mod options;
#[cfg(test)]
mod test;

use std::{fmt, str::FromStr, sync::Arc};

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize};

use self::options::*;
use crate::{
    bson::Document,
    concern::{ReadConcern, WriteConcern},
    error::{Error, Result},
    operation::{execute_operation, Count},
    selection_criteria::SelectionCriteria,
    transport::TransportEngine,
};

/// `Collection` is the client-side abstraction of a MongoDB Collection. It binds a
/// [`TransportEngine`] to a [`Namespace`] and carries the collection-level defaults (read
/// concern, write concern and read preference) that operations fall back to.
///
/// `Collection` uses [`std::sync::Arc`](https://doc.rust-lang.org/std/sync/struct.Arc.html) internally,
/// so it can safely be cloned and shared across threads.
///
/// # Example
/// ```rust
/// # use std::sync::Arc;
/// # use mongodb_core::{
/// #     bson::Document,
/// #     doc,
/// #     options::{CollectionOptions, CountOptions, ReadConcern},
/// #     selection_criteria::ReadPreference,
/// #     transport::{RawError, TransportEngine},
/// #     Collection,
/// #     Namespace,
/// # };
/// struct Fixed;
///
/// impl TransportEngine for Fixed {
///     fn count(
///         &self,
///         _filter: &Document,
///         _skip: i64,
///         _limit: i64,
///         _options: Option<&Document>,
///         _read_preference: Option<&ReadPreference>,
///     ) -> Result<i64, RawError> {
///         Ok(3)
///     }
/// }
///
/// let coll = Collection::new(
///     Arc::new(Fixed),
///     Namespace::new("shop", "orders"),
///     CollectionOptions::builder()
///         .read_concern(ReadConcern::majority())
///         .build(),
/// );
/// let n = coll
///     .count(doc! { "status": "open" }, CountOptions::builder().limit(10).build())
///     .unwrap();
/// assert_eq!(n, 3);
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    engine: Arc<dyn TransportEngine>,
    ns: Namespace,
    options: CollectionOptions,
}

impl Collection {
    /// Creates a `Collection` that hands its commands to `engine`.
    pub fn new(
        engine: Arc<dyn TransportEngine>,
        ns: Namespace,
        options: impl Into<Option<CollectionOptions>>,
    ) -> Self {
        Self {
            inner: Arc::new(CollectionInner {
                engine,
                ns,
                options: options.into().unwrap_or_default(),
            }),
        }
    }

    /// Gets the name of the `Collection`.
    pub fn name(&self) -> &str {
        &self.inner.ns.coll
    }

    /// Gets the namespace of the `Collection`.
    ///
    /// The namespace of a MongoDB collection is the concatenation of the name of the database
    /// containing it, the '.' character, and the name of the collection itself. For example, if a
    /// collection named "bar" is created in a database named "foo", the namespace of the collection
    /// is "foo.bar".
    pub fn namespace(&self) -> Namespace {
        self.inner.ns.clone()
    }

    /// Gets the selection criteria of the `Collection`.
    pub fn selection_criteria(&self) -> Option<&SelectionCriteria> {
        self.inner.options.selection_criteria.as_ref()
    }

    /// Gets the read concern of the `Collection`.
    pub fn read_concern(&self) -> Option<&ReadConcern> {
        self.inner.options.read_concern.as_ref()
    }

    /// Gets the write concern of the `Collection`.
    pub fn write_concern(&self) -> Option<&WriteConcern> {
        self.inner.options.write_concern.as_ref()
    }

    /// Counts the documents in the collection that match `filter`.
    ///
    /// The read concern and read preference default to the collection's when `options` does not
    /// set them.
    pub fn count(
        &self,
        filter: impl Into<Option<Document>>,
        options: impl Into<Option<CountOptions>>,
    ) -> Result<u64> {
        self.count_with_bounds(filter, 0, 0, options)
    }

    /// Counts the documents in the collection that match `filter`, handing `skip` and `limit` to
    /// the engine as positional bounds. A bound that is also set in `options` is taken from
    /// `options` only.
    pub fn count_with_bounds(
        &self,
        filter: impl Into<Option<Document>>,
        skip: i64,
        limit: i64,
        options: impl Into<Option<CountOptions>>,
    ) -> Result<u64> {
        let op = Count::new(
            self.namespace(),
            filter.into().unwrap_or_default(),
            options.into(),
        )
        .with_bounds(skip, limit)
        .with_collection_defaults(&self.inner.options);
        execute_operation(self.inner.engine.as_ref(), op)
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("namespace", &self.inner.ns)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

/// A struct modeling the canonical name for a collection in MongoDB.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// The name of the database associated with this namespace.
    pub db: String,

    /// The name of the collection this namespace corresponds to.
    pub coll: String,
}

impl Namespace {
    /// Construct a `Namespace` with the given database and collection.
    pub fn new(db: impl Into<String>, coll: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            coll: coll.into(),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}.{}", self.db, self.coll)
    }
}

impl<'de> Deserialize<'de> for Namespace {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Self::from_str(&s).map_err(|_| D::Error::custom("Missing one or more fields in namespace"))
    }
}

impl Serialize for Namespace {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&(self.db.clone() + "." + &self.coll))
    }
}

impl FromStr for Namespace {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('.');

        let db = parts.next();
        let coll = parts.collect::<Vec<_>>().join(".");

        match (db, coll) {
            (Some(db), coll) if !db.is_empty() && !coll.is_empty() => Ok(Self {
                db: db.to_string(),
                coll,
            }),
            _ => Err(Self::Err::invalid_argument(
                "Missing one or more fields in namespace",
            )),
        }
    }
}
