//! Encoding of Rust types into [`Bson`] and decoding of [`Bson`] back into Rust types through
//! `serde`.
//!
//! ```
//! # use mongodb_core::{codec, doc};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Item {
//!     name: String,
//!     quantity: i32,
//!     note: Option<String>,
//! }
//!
//! let item = Item { name: "pen".into(), quantity: 3, note: None };
//! let doc = codec::to_document(&item)?;
//! assert_eq!(doc, doc! { "name": "pen", "quantity": 3 });
//! assert_eq!(codec::from_document::<Item>(doc)?, item);
//! # Ok::<(), mongodb_core::error::Error>(())
//! ```

pub mod de;
pub mod ser;
#[cfg(test)]
mod test;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::bson::{Bson, Document};

pub use self::{de::Deserializer, ser::Serializer};

/// One step on the way from a decoded root value to a nested field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
#[non_exhaustive]
pub enum PathSegment {
    /// A document key.
    #[display("{_0}")]
    Key(String),

    /// An array index.
    #[display("[{_0}]")]
    Index(usize),
}

/// The location of a field within a decoded value, rendered as `a.b[2].c`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this path points at the root value.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push_front(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Encodes a `T` into a [`Bson`] value.
pub fn to_bson<T>(value: &T) -> Result<Bson, ser::Error>
where
    T: Serialize + ?Sized,
{
    value.serialize(Serializer::new())
}

/// Encodes a `T` into a [`Document`], failing if `T` does not encode to a document.
pub fn to_document<T>(value: &T) -> Result<Document, ser::Error>
where
    T: Serialize + ?Sized,
{
    match to_bson(value)? {
        Bson::Document(doc) => Ok(doc),
        other => Err(ser::Error::NotADocument {
            element_type: other.element_type(),
        }),
    }
}

/// Decodes a `T` from a [`Bson`] value.
pub fn from_bson<T>(bson: Bson) -> Result<T, de::Error>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::new(bson))
}

/// Decodes a `T` from a [`Document`].
pub fn from_document<T>(doc: Document) -> Result<T, de::Error>
where
    T: DeserializeOwned,
{
    from_bson(Bson::Document(doc))
}

/// Encodes an `Option` field as an explicit `null` when it is `None` instead of omitting it.
///
/// ```
/// # use mongodb_core::{codec, doc};
/// #[derive(serde::Serialize)]
/// struct Update {
///     #[serde(serialize_with = "mongodb_core::codec::serialize_none_as_null")]
///     expires: Option<i64>,
/// }
///
/// let doc = codec::to_document(&Update { expires: None })?;
/// assert_eq!(doc, doc! { "expires": null });
/// # Ok::<(), mongodb_core::error::Error>(())
/// ```
pub fn serialize_none_as_null<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: serde::Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_unit(),
    }
}
