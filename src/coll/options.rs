use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    bson::Document,
    concern::{ReadConcern, WriteConcern},
    selection_criteria::SelectionCriteria,
    serde_util::{deserialize_duration_option_from_u64_millis, serialize_duration_option_as_int_millis},
};

/// These are the valid options for creating a [`Collection`](../struct.Collection.html) with
/// [`Collection::new`](../struct.Collection.html#method.new).
#[derive(Clone, Debug, Default, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(strip_option)))]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct CollectionOptions {
    /// The default read preference for operations.
    #[serde(rename = "readPreference")]
    pub selection_criteria: Option<SelectionCriteria>,

    /// The default read concern for operations.
    pub read_concern: Option<ReadConcern>,

    /// The default write concern for operations.
    pub write_concern: Option<WriteConcern>,
}

/// Specifies the index to use for an operation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Hint {
    /// Specifies the keys of the index to use.
    Keys(Document),
    /// Specifies the name of the index to use.
    Name(String),
}

impl From<Document> for Hint {
    fn from(keys: Document) -> Self {
        Self::Keys(keys)
    }
}

impl From<&str> for Hint {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Specifies the options to a [`Collection::count`](../struct.Collection.html#method.count)
/// operation.
///
/// `read_concern` and `selection_criteria` are never part of the encoded options document: the
/// read concern is composed into it separately and the read preference is handed to the transport
/// engine on its own.
///
/// ```rust
/// # use std::time::Duration;
/// # use mongodb_core::{codec, doc, options::CountOptions};
/// let options = CountOptions::builder()
///     .limit(10)
///     .max_time(Duration::from_millis(500))
///     .build();
/// assert_eq!(
///     codec::to_document(&options).unwrap(),
///     doc! { "limit": 10_i64, "maxTimeMS": 500 }
/// );
/// ```
#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(default, setter(strip_option)))]
#[non_exhaustive]
pub struct CountOptions {
    /// The collation to use for the operation.
    ///
    /// See the [documentation](https://www.mongodb.com/docs/manual/reference/collation/) for more
    /// information on how to use this option.
    pub collation: Option<Document>,

    /// The index to use for the operation.
    pub hint: Option<Hint>,

    /// The maximum number of documents to count.
    pub limit: Option<i64>,

    /// The maximum amount of time to allow the query to run.
    ///
    /// This options maps to the `maxTimeMS` MongoDB query option, so the duration will be sent
    /// across the wire as an integer number of milliseconds.
    #[serde(
        rename = "maxTimeMS",
        serialize_with = "serialize_duration_option_as_int_millis",
        deserialize_with = "deserialize_duration_option_from_u64_millis",
        default
    )]
    pub max_time: Option<Duration>,

    /// The number of documents to skip before counting.
    pub skip: Option<i64>,

    /// The level of the read concern.
    ///
    /// If none specified, the default set on the collection will be used.
    #[serde(skip_serializing)]
    pub read_concern: Option<ReadConcern>,

    /// The criteria used to select a server for this operation.
    ///
    /// If none specified, the default set on the collection will be used.
    #[serde(skip_serializing, rename = "readPreference")]
    pub selection_criteria: Option<SelectionCriteria>,
}
