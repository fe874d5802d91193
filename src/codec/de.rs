//! Decoding of [`Bson`] into `serde::Deserialize` types.

use std::fmt;

use serde::de::{
    self,
    value::StringDeserializer,
    DeserializeSeed,
    EnumAccess,
    IntoDeserializer,
    MapAccess,
    SeqAccess,
    VariantAccess,
    Visitor,
};

use crate::{
    bson::{BinarySubtype, Bson, Document},
    codec::{Path, PathSegment},
};

/// An error that occurred while decoding, with the path to the offending field.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Error {
    /// What went wrong.
    pub kind: DecodingErrorKind,

    /// Where in the decoded value it went wrong.
    pub path: Path,
}

/// The kinds of decoding failures.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodingErrorKind {
    /// A required field was absent.
    #[error("missing field `{field}`")]
    #[non_exhaustive]
    MissingField { field: String },

    /// A value was of a kind the target type cannot be decoded from.
    #[error("invalid type: {found}, expected {expected}")]
    #[non_exhaustive]
    TypeMismatch { found: String, expected: String },

    /// A custom error raised by a `Deserialize` implementation.
    #[error("{message}")]
    #[non_exhaustive]
    Custom { message: String },
}

impl Error {
    fn new(kind: DecodingErrorKind) -> Self {
        Self {
            kind,
            path: Path::default(),
        }
    }

    fn within(mut self, segment: PathSegment) -> Self {
        self.path.push_front(segment);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} at `{}`", self.kind, self.path)
        }
    }
}

impl std::error::Error for Error {}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::new(DecodingErrorKind::Custom {
            message: msg.to_string(),
        })
    }

    fn invalid_type(unexp: de::Unexpected, exp: &dyn de::Expected) -> Self {
        Self::new(DecodingErrorKind::TypeMismatch {
            found: unexp.to_string(),
            expected: exp.to_string(),
        })
    }

    fn missing_field(field: &'static str) -> Self {
        Self::new(DecodingErrorKind::MissingField {
            field: field.to_string(),
        })
        .within(PathSegment::Key(field.to_string()))
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Serde deserializer reading from an owned [`Bson`] value.
pub struct Deserializer {
    value: Bson,
}

impl Deserializer {
    /// Creates a new deserializer over the given value.
    pub fn new(value: Bson) -> Self {
        Self { value }
    }
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Bson::Double(v) => visitor.visit_f64(v),
            Bson::String(s) => visitor.visit_string(s),
            Bson::Array(arr) => visitor.visit_seq(ArrayAccess::new(arr)),
            Bson::Document(doc) => visitor.visit_map(DocumentAccess::new(doc)),
            Bson::Boolean(b) => visitor.visit_bool(b),
            Bson::Null => visitor.visit_unit(),
            Bson::Int32(v) => visitor.visit_i32(v),
            Bson::Int64(v) => visitor.visit_i64(v),
            Bson::Binary(binary) if binary.subtype() == BinarySubtype::Generic => {
                visitor.visit_byte_buf(binary.into_bytes())
            }
            other => {
                let element_type = other.element_type();
                match other.into_extended_document() {
                    Some(doc) => visitor.visit_map(DocumentAccess::new(doc)),
                    None => Err(de::Error::custom(format!(
                        "cannot decode a value of type {element_type}"
                    ))),
                }
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Bson::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Bson::Binary(binary) => visitor.visit_byte_buf(binary.into_bytes()),
            other => de::Deserializer::deserialize_any(Deserializer::new(other), visitor),
        }
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_bytes(self, visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Bson::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            Bson::Document(doc) if doc.len() == 1 => {
                let mut entries = doc.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer { variant, value }),
                    None => Err(de::Error::custom("expected a single-key document")),
                }
            }
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(&other.element_type().to_string()),
                &"a string or a single-key document",
            )),
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string unit
        unit_struct seq tuple tuple_struct map struct identifier ignored_any
    }
}

struct ArrayAccess {
    iter: std::iter::Enumerate<std::vec::IntoIter<Bson>>,
    len: usize,
}

impl ArrayAccess {
    fn new(arr: Vec<Bson>) -> Self {
        Self {
            len: arr.len(),
            iter: arr.into_iter().enumerate(),
        }
    }
}

impl<'de> SeqAccess<'de> for ArrayAccess {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((index, value)) => {
                self.len -= 1;
                seed.deserialize(Deserializer::new(value))
                    .map(Some)
                    .map_err(|e| e.within(PathSegment::Index(index)))
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

struct DocumentAccess {
    iter: <Document as IntoIterator>::IntoIter,
    len: usize,
    pending: Option<(String, Bson)>,
}

impl DocumentAccess {
    fn new(doc: Document) -> Self {
        Self {
            len: doc.len(),
            iter: doc.into_iter(),
            pending: None,
        }
    }
}

impl<'de> MapAccess<'de> for DocumentAccess {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.len -= 1;
                let decoded = seed.deserialize(StringDeserializer::<Error>::new(key.clone()))?;
                self.pending = Some((key, value));
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some((key, value)) => seed
                .deserialize(Deserializer::new(value))
                .map_err(|e| e.within(PathSegment::Key(key))),
            None => Err(de::Error::custom("value requested before key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

struct EnumDeserializer {
    variant: String,
    value: Bson,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, VariantDeserializer)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StringDeserializer::<Error>::new(self.variant.clone()))?;
        Ok((
            variant,
            VariantDeserializer {
                name: self.variant,
                value: self.value,
            },
        ))
    }
}

struct VariantDeserializer {
    name: String,
    value: Bson,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Bson::Null => Ok(()),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(&other.element_type().to_string()),
                &"a unit variant",
            )),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        let name = self.name;
        seed.deserialize(Deserializer::new(self.value))
            .map_err(|e| e.within(PathSegment::Key(name)))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let name = self.name;
        de::Deserializer::deserialize_seq(Deserializer::new(self.value), visitor)
            .map_err(|e| e.within(PathSegment::Key(name)))
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let name = self.name;
        de::Deserializer::deserialize_map(Deserializer::new(self.value), visitor)
            .map_err(|e| e.within(PathSegment::Key(name)))
    }
}
