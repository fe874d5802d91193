//! This crate contains the BSON value model and the command options composition layer of a
//! MongoDB client. It builds, encodes and compares documents and decides which operation options
//! are merged into an outgoing command before the command is handed to a lower-level
//! [`TransportEngine`](transport::TransportEngine).
//!
//! # Documents
//! [`Document`] is an insertion-ordered map from keys to [`Bson`] values. The [`doc!`] and
//! [`bson!`] macros build documents and values with a JSON-like syntax:
//!
//! ```rust
//! # use mongodb_core::{bson::Bson, doc};
//! let doc = doc! {
//!     "title": "Parable of the Sower",
//!     "year": 1993,
//!     "tags": ["fiction", "dystopia"],
//! };
//! assert_eq!(doc.get("year"), Some(&Bson::Int32(1993)));
//! ```
//!
//! Numeric values compare by their mathematical value, so a 32-bit integer, a 64-bit integer, a
//! double and a decimal that denote the same number are equal and hash identically.
//!
//! # Serde
//! Any type implementing serde's `Serialize` and `Deserialize` can be converted to and from
//! [`Bson`] and [`Document`] with the functions in the [`codec`] module. Decoding errors carry the
//! path of the offending field.
//!
//! # Options composition
//! Operation options are typed structs with builders, found in the [`options`] module. When a
//! [`Collection`] runs a command it encodes the options, appends the read concern only when doing
//! so changes the server's behavior, and resolves the read preference against the collection's
//! defaults:
//!
//! ```rust
//! # use mongodb_core::{concern::append_if_needed, doc, options::ReadConcern};
//! let composed = append_if_needed(
//!     Some(&ReadConcern::majority()),
//!     None,
//!     Some(&ReadConcern::new()),
//! )?;
//! assert_eq!(composed, Some(doc! { "readConcern": { "level": "majority" } }));
//! # Ok::<(), mongodb_core::error::Error>(())
//! ```
//!
//! # Feature flags
//!
//! | Feature            | Description                                                                 |
//! |:-------------------|:----------------------------------------------------------------------------|
//! | `tracing-unstable` | Emit [`tracing`](https://crates.io/crates/tracing) events for every command handed to the transport engine, under the `mongodb_core::command` target. |
//!
//! ## Minimum supported Rust version (MSRV)
//!
//! The MSRV for this crate is currently 1.83.0. This will be rarely be increased, and if it ever is,
//! it will only happen in a minor or major version release.

#![warn(missing_docs)]
#![cfg_attr(docsrs, warn(rustdoc::missing_crate_level_docs))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod options;

pub mod bson;
pub mod codec;
mod coll;
pub mod concern;
pub mod error;
mod operation;
pub mod selection_criteria;
mod serde_util;
#[cfg(feature = "tracing-unstable")]
mod trace;
pub mod transport;

pub use crate::{
    bson::{Bson, Document},
    coll::{Collection, Namespace},
};
