//! The BSON value model: [`Bson`], [`Document`] and the BSON value types.

pub(crate) mod binary;
pub(crate) mod datetime;
pub(crate) mod decimal128;
pub(crate) mod document;
pub(crate) mod extjson;
mod macros;
pub(crate) mod numeric;
pub mod oid;
pub(crate) mod serde_impl;
#[cfg(test)]
mod test;

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use numeric::Numeric;

pub use self::{
    binary::{Binary, BinarySubtype},
    datetime::DateTime,
    decimal128::Decimal128,
    document::{Document, Iter, Keys, Values},
    oid::ObjectId,
};
pub use crate::doc;

/// Possible BSON value types.
#[derive(Clone, Default)]
pub enum Bson {
    /// 64-bit binary floating point
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Array
    Array(Array),
    /// Embedded document
    Document(Document),
    /// Boolean value
    Boolean(bool),
    /// Null value
    #[default]
    Null,
    /// Regular expression
    RegularExpression(Regex),
    /// JavaScript code
    JavaScriptCode(String),
    /// JavaScript code w/ scope
    JavaScriptCodeWithScope(JavaScriptCodeWithScope),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// Timestamp
    Timestamp(Timestamp),
    /// Binary data
    Binary(Binary),
    /// [ObjectId](http://dochub.mongodb.org/core/objectids)
    ObjectId(ObjectId),
    /// UTC datetime
    DateTime(DateTime),
    /// 128-bit decimal floating point
    Decimal128(Decimal128),
    /// Max key
    MaxKey,
    /// Min key
    MinKey,
}

/// Alias for `Vec<Bson>`.
pub type Array = Vec<Bson>;

/// All available BSON element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[repr(u8)]
#[non_exhaustive]
pub enum ElementType {
    /// 64-bit binary floating point
    Double = 0x01,
    /// UTF-8 string
    String = 0x02,
    /// Embedded document
    EmbeddedDocument = 0x03,
    /// Array
    Array = 0x04,
    /// Binary data
    Binary = 0x05,
    /// [ObjectId](http://dochub.mongodb.org/core/objectids)
    ObjectId = 0x07,
    /// Bool value
    Boolean = 0x08,
    /// UTC datetime
    DateTime = 0x09,
    /// Null value
    Null = 0x0A,
    /// Regular expression
    RegularExpression = 0x0B,
    /// JavaScript code
    JavaScriptCode = 0x0D,
    /// JavaScript code w/ scope
    JavaScriptCodeWithScope = 0x0F,
    /// 32-bit signed integer
    Int32 = 0x10,
    /// Timestamp
    Timestamp = 0x11,
    /// 64-bit signed integer
    Int64 = 0x12,
    /// 128-bit decimal floating point
    Decimal128 = 0x13,
    /// Max key
    MaxKey = 0x7F,
    /// Min key
    MinKey = 0xFF,
}

impl ElementType {
    /// Attempt to convert from a `u8`.
    pub fn from(tag: u8) -> Option<ElementType> {
        use self::ElementType::*;
        Some(match tag {
            0x01 => Double,
            0x02 => String,
            0x03 => EmbeddedDocument,
            0x04 => Array,
            0x05 => Binary,
            0x07 => ObjectId,
            0x08 => Boolean,
            0x09 => DateTime,
            0x0A => Null,
            0x0B => RegularExpression,
            0x0D => JavaScriptCode,
            0x0F => JavaScriptCodeWithScope,
            0x10 => Int32,
            0x11 => Timestamp,
            0x12 => Int64,
            0x13 => Decimal128,
            0x7F => MaxKey,
            0xFF => MinKey,
            _ => return None,
        })
    }
}

/// Represents a BSON timestamp value: the seconds component and the ordinal of the operation
/// within that second.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash)]
pub struct Timestamp {
    /// The number of seconds since the Unix epoch.
    pub time: u32,

    /// An incrementing value to order operations within a given second.
    pub increment: u32,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Timestamp({}, {})", self.time, self.increment)
    }
}

/// Represents a BSON regular expression value.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Regex {
    /// The regex pattern to match.
    pub pattern: String,

    /// The options for the regex. Options are stored in alphabetical order.
    pub options: String,
}

impl Regex {
    /// Creates a new regular expression, sorting the option characters.
    pub fn new(pattern: impl AsRef<str>, options: impl AsRef<str>) -> Self {
        let mut chars: Vec<_> = options.as_ref().chars().collect();
        chars.sort_unstable();
        Self {
            pattern: pattern.as_ref().to_string(),
            options: chars.into_iter().collect(),
        }
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "/{}/{}", self.pattern, self.options)
    }
}

/// Represents a BSON code with scope value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JavaScriptCodeWithScope {
    /// The JavaScript code.
    pub code: String,

    /// The scope document containing variable bindings.
    pub scope: Document,
}

impl fmt::Display for JavaScriptCodeWithScope {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.code)
    }
}

impl Bson {
    /// Get the [`ElementType`] of this value.
    pub fn element_type(&self) -> ElementType {
        match *self {
            Bson::Double(..) => ElementType::Double,
            Bson::String(..) => ElementType::String,
            Bson::Array(..) => ElementType::Array,
            Bson::Document(..) => ElementType::EmbeddedDocument,
            Bson::Boolean(..) => ElementType::Boolean,
            Bson::Null => ElementType::Null,
            Bson::RegularExpression(..) => ElementType::RegularExpression,
            Bson::JavaScriptCode(..) => ElementType::JavaScriptCode,
            Bson::JavaScriptCodeWithScope(..) => ElementType::JavaScriptCodeWithScope,
            Bson::Int32(..) => ElementType::Int32,
            Bson::Int64(..) => ElementType::Int64,
            Bson::Timestamp(..) => ElementType::Timestamp,
            Bson::Binary(..) => ElementType::Binary,
            Bson::ObjectId(..) => ElementType::ObjectId,
            Bson::DateTime(..) => ElementType::DateTime,
            Bson::Decimal128(..) => ElementType::Decimal128,
            Bson::MaxKey => ElementType::MaxKey,
            Bson::MinKey => ElementType::MinKey,
        }
    }

    /// The rank of this value's kind in the server's cross-type sort order. `MinKey` ranks below
    /// every other kind and `MaxKey` above; all numeric kinds share a rank.
    pub fn canonical_rank(&self) -> i32 {
        match self {
            Bson::MinKey => -1,
            Bson::Null => 5,
            Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 10,
            Bson::String(_) => 15,
            Bson::Document(_) => 20,
            Bson::Array(_) => 25,
            Bson::Binary(_) => 30,
            Bson::ObjectId(_) => 35,
            Bson::Boolean(_) => 40,
            Bson::DateTime(_) => 45,
            Bson::Timestamp(_) => 47,
            Bson::RegularExpression(_) => 50,
            Bson::JavaScriptCode(_) => 60,
            Bson::JavaScriptCodeWithScope(_) => 65,
            Bson::MaxKey => 127,
        }
    }

    fn numeric(&self) -> Option<Numeric> {
        match *self {
            Bson::Int32(v) => Some(Numeric::from_i64(i64::from(v))),
            Bson::Int64(v) => Some(Numeric::from_i64(v)),
            Bson::Double(v) => Some(Numeric::from_f64(v)),
            Bson::Decimal128(v) => Some(v.to_numeric()),
            _ => None,
        }
    }

    /// Whether this value is one of the numeric kinds.
    pub fn is_number(&self) -> bool {
        self.numeric().is_some()
    }

    /// Converts a numeric value to an `i32` if that is lossless.
    pub fn to_i32(&self) -> Option<i32> {
        self.to_i64().and_then(|v| i32::try_from(v).ok())
    }

    /// Converts a numeric value to an `i64` if that is lossless.
    pub fn to_i64(&self) -> Option<i64> {
        self.numeric()?.to_i64()
    }

    /// Converts a numeric value to an `f64` if that is lossless.
    pub fn to_f64(&self) -> Option<f64> {
        let candidate = match *self {
            Bson::Double(v) => return Some(v),
            Bson::Int32(v) => f64::from(v),
            Bson::Int64(v) => v as f64,
            Bson::Decimal128(v) => v.to_string().parse().ok()?,
            _ => return None,
        };
        (Some(Numeric::from_f64(candidate)) == self.numeric()).then_some(candidate)
    }

    /// Converts a numeric value to a [`Decimal128`]. Integers convert exactly; doubles convert
    /// through their shortest round-trip decimal representation, so `5.5` becomes
    /// `Decimal128("5.5")`.
    pub fn to_decimal128(&self) -> Option<Decimal128> {
        match *self {
            Bson::Decimal128(v) => Some(v),
            Bson::Int32(v) => Some(Decimal128::from_i64(i64::from(v))),
            Bson::Int64(v) => Some(Decimal128::from_i64(v)),
            Bson::Double(v) => v.to_string().parse().ok(),
            _ => None,
        }
    }

    /// If this value is a string, returns the associated `&str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Bson::String(s) => Some(s),
            _ => None,
        }
    }

    /// If this value is a document, returns a reference to it.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Bson::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// If this value is an array, returns a reference to it.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Bson::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If this value is a boolean, returns it.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Bson::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// If this value is an `Int32`, returns it.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Bson::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// If this value is an `Int64`, returns it.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Bson::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// If this value is an `ObjectId`, returns it.
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match *self {
            Bson::ObjectId(oid) => Some(oid),
            _ => None,
        }
    }

    /// Whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Bson::Null)
    }
}

impl PartialEq for Bson {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(lhs), Some(rhs)) = (self.numeric(), other.numeric()) {
            return lhs == rhs;
        }

        match (self, other) {
            (Bson::String(a), Bson::String(b)) => a == b,
            (Bson::Array(a), Bson::Array(b)) => a == b,
            (Bson::Document(a), Bson::Document(b)) => a == b,
            (Bson::Boolean(a), Bson::Boolean(b)) => a == b,
            (Bson::Null, Bson::Null) => true,
            (Bson::RegularExpression(a), Bson::RegularExpression(b)) => a == b,
            (Bson::JavaScriptCode(a), Bson::JavaScriptCode(b)) => a == b,
            (Bson::JavaScriptCodeWithScope(a), Bson::JavaScriptCodeWithScope(b)) => a == b,
            (Bson::Timestamp(a), Bson::Timestamp(b)) => a == b,
            (Bson::Binary(a), Bson::Binary(b)) => a == b,
            (Bson::ObjectId(a), Bson::ObjectId(b)) => a == b,
            (Bson::DateTime(a), Bson::DateTime(b)) => a == b,
            (Bson::MaxKey, Bson::MaxKey) | (Bson::MinKey, Bson::MinKey) => true,
            _ => false,
        }
    }
}

impl Eq for Bson {}

impl Hash for Bson {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let Some(numeric) = self.numeric() {
            ElementType::Double.hash(state);
            numeric.hash(state);
            return;
        }

        self.element_type().hash(state);
        match self {
            Bson::String(s) | Bson::JavaScriptCode(s) => s.hash(state),
            Bson::Array(a) => a.hash(state),
            Bson::Document(d) => d.hash(state),
            Bson::Boolean(b) => b.hash(state),
            Bson::RegularExpression(r) => r.hash(state),
            Bson::JavaScriptCodeWithScope(c) => c.hash(state),
            Bson::Timestamp(t) => t.hash(state),
            Bson::Binary(b) => b.hash(state),
            Bson::ObjectId(o) => o.hash(state),
            Bson::DateTime(d) => d.hash(state),
            Bson::Null | Bson::MaxKey | Bson::MinKey => {}
            Bson::Double(_) | Bson::Int32(_) | Bson::Int64(_) | Bson::Decimal128(_) => {}
        }
    }
}

impl fmt::Debug for Bson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bson::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Bson::String(v) => f.debug_tuple("String").field(v).finish(),
            Bson::Array(v) => f.debug_tuple("Array").field(v).finish(),
            Bson::Document(v) => fmt::Debug::fmt(v, f),
            Bson::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            Bson::Null => f.write_str("Null"),
            Bson::RegularExpression(v) => f.debug_tuple("RegularExpression").field(v).finish(),
            Bson::JavaScriptCode(v) => f.debug_tuple("JavaScriptCode").field(v).finish(),
            Bson::JavaScriptCodeWithScope(v) => {
                f.debug_tuple("JavaScriptCodeWithScope").field(v).finish()
            }
            Bson::Int32(v) => f.debug_tuple("Int32").field(v).finish(),
            Bson::Int64(v) => f.debug_tuple("Int64").field(v).finish(),
            Bson::Timestamp(v) => fmt::Debug::fmt(v, f),
            Bson::Binary(v) => fmt::Debug::fmt(v, f),
            Bson::ObjectId(v) => fmt::Debug::fmt(v, f),
            Bson::DateTime(v) => fmt::Debug::fmt(v, f),
            Bson::Decimal128(v) => fmt::Debug::fmt(v, f),
            Bson::MaxKey => f.write_str("MaxKey"),
            Bson::MinKey => f.write_str("MinKey"),
        }
    }
}

impl fmt::Display for Bson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone().into_relaxed_extjson())
    }
}

impl From<f32> for Bson {
    fn from(a: f32) -> Bson {
        Bson::Double(a.into())
    }
}

impl From<f64> for Bson {
    fn from(a: f64) -> Bson {
        Bson::Double(a)
    }
}

impl From<&str> for Bson {
    fn from(s: &str) -> Bson {
        Bson::String(s.to_owned())
    }
}

impl From<String> for Bson {
    fn from(a: String) -> Bson {
        Bson::String(a)
    }
}

impl From<&String> for Bson {
    fn from(a: &String) -> Bson {
        Bson::String(a.clone())
    }
}

impl From<Document> for Bson {
    fn from(a: Document) -> Bson {
        Bson::Document(a)
    }
}

impl From<bool> for Bson {
    fn from(a: bool) -> Bson {
        Bson::Boolean(a)
    }
}

impl From<Regex> for Bson {
    fn from(regex: Regex) -> Bson {
        Bson::RegularExpression(regex)
    }
}

impl From<JavaScriptCodeWithScope> for Bson {
    fn from(code_with_scope: JavaScriptCodeWithScope) -> Bson {
        Bson::JavaScriptCodeWithScope(code_with_scope)
    }
}

impl From<Binary> for Bson {
    fn from(binary: Binary) -> Bson {
        Bson::Binary(binary)
    }
}

impl From<Timestamp> for Bson {
    fn from(ts: Timestamp) -> Bson {
        Bson::Timestamp(ts)
    }
}

impl From<i32> for Bson {
    fn from(a: i32) -> Bson {
        Bson::Int32(a)
    }
}

impl From<i64> for Bson {
    fn from(a: i64) -> Bson {
        Bson::Int64(a)
    }
}

impl From<u32> for Bson {
    fn from(a: u32) -> Bson {
        Bson::Int64(a.into())
    }
}

impl From<ObjectId> for Bson {
    fn from(a: ObjectId) -> Bson {
        Bson::ObjectId(a)
    }
}

impl From<DateTime> for Bson {
    fn from(a: DateTime) -> Bson {
        Bson::DateTime(a)
    }
}

impl From<Decimal128> for Bson {
    fn from(d: Decimal128) -> Bson {
        Bson::Decimal128(d)
    }
}

impl<T: Into<Bson>> From<Vec<T>> for Bson {
    fn from(v: Vec<T>) -> Bson {
        Bson::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Bson>> From<Option<T>> for Bson {
    fn from(a: Option<T>) -> Bson {
        match a {
            None => Bson::Null,
            Some(t) => t.into(),
        }
    }
}
