//! Contains all of the types needed to specify options to MongoDB operations.
//!
//! Most of the options structs in this module use the
//! [`typed-builder`](https://crates.io/crates/typed-builder) crate to derive a type-safe builder
//! API on them. For example, to create an instance of
//! [`CountOptions`](struct.CountOptions.html) with only `limit` and `skip` set, the builder
//! API can be used as follows:
//!
//! ```rust
//! # use mongodb_core::options::CountOptions;
//! #
//! # let options = CountOptions::builder()
//! #                   .limit(20)
//! #                   .skip(5)
//! #                   .build();
//! ```

pub use crate::{
    coll::options::*,
    concern::{Acknowledgment, ReadConcern, ReadConcernLevel, WriteConcern},
    selection_criteria::*,
};
