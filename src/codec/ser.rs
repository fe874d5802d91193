//! Encoding of `serde::Serialize` types into [`Bson`].

use serde::ser::{self, Serialize};

use crate::bson::{serde_impl::EXTENDED_JSON_NEWTYPE, Binary, Bson, Document, ElementType};

/// Possible errors that can arise during encoding.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A map was encoded whose keys do not encode to strings.
    #[error("document keys must be strings, got {element_type}")]
    #[non_exhaustive]
    InvalidDocumentKey { element_type: ElementType },

    /// An unsigned integer was encoded that does not fit into an `i64`.
    #[error("unsigned integer {value} cannot be represented as a signed 64-bit integer")]
    #[non_exhaustive]
    UnsignedIntegerExceededRange { value: u64 },

    /// A value was encoded with `to_document` that does not encode to a document.
    #[error("expected the value to encode to a document, got {element_type}")]
    #[non_exhaustive]
    NotADocument { element_type: ElementType },

    /// A custom error raised by a `Serialize` implementation.
    #[error("{message}")]
    #[non_exhaustive]
    Custom { message: String },

    #[doc(hidden)]
    #[error("a `None` field was omitted")]
    NoneOmitted,
}

impl ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Custom {
            message: msg.to_string(),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Serde serializer producing [`Bson`] values.
///
/// Struct fields and map values holding `None` are omitted; `None` anywhere else encodes as
/// [`Bson::Null`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Serializer {
    omit_none: bool,
}

impl Serializer {
    /// Creates a new serializer.
    pub fn new() -> Self {
        Self::default()
    }

    fn field() -> Self {
        Self { omit_none: true }
    }
}

fn serialize_field_value<T>(value: &T) -> Result<Option<Bson>>
where
    T: Serialize + ?Sized,
{
    match value.serialize(Serializer::field()) {
        Ok(bson) => Ok(Some(bson)),
        Err(Error::NoneOmitted) => Ok(None),
        Err(e) => Err(e),
    }
}

impl ser::Serializer for Serializer {
    type Ok = Bson;
    type Error = Error;

    type SerializeSeq = ArraySerializer;
    type SerializeTuple = ArraySerializer;
    type SerializeTupleStruct = ArraySerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = DocumentSerializer;
    type SerializeStruct = DocumentSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Bson> {
        Ok(Bson::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Bson> {
        ser::Serializer::serialize_i32(self, v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Bson> {
        ser::Serializer::serialize_i32(self, v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Bson> {
        Ok(Bson::Int32(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Bson> {
        Ok(Bson::Int64(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Bson> {
        ser::Serializer::serialize_i32(self, v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Bson> {
        ser::Serializer::serialize_i32(self, v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Bson> {
        ser::Serializer::serialize_i64(self, v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Bson> {
        i64::try_from(v)
            .map(Bson::Int64)
            .map_err(|_| Error::UnsignedIntegerExceededRange { value: v })
    }

    fn serialize_f32(self, v: f32) -> Result<Bson> {
        ser::Serializer::serialize_f64(self, v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Bson> {
        Ok(Bson::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Bson> {
        Ok(Bson::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Bson> {
        Ok(Bson::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Bson> {
        Ok(Bson::Binary(Binary::generic(v)))
    }

    fn serialize_none(self) -> Result<Bson> {
        if self.omit_none {
            return Err(Error::NoneOmitted);
        }
        Ok(Bson::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Bson>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Bson> {
        Ok(Bson::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Bson> {
        ser::Serializer::serialize_unit(self)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Bson> {
        Ok(Bson::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Bson>
    where
        T: Serialize + ?Sized,
    {
        if name == EXTENDED_JSON_NEWTYPE {
            return match value.serialize(Serializer::new())? {
                Bson::Document(doc) => Ok(Bson::from_extended_document(doc)),
                other => Ok(other),
            };
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Bson>
    where
        T: Serialize + ?Sized,
    {
        let mut doc = Document::new();
        doc.insert(variant, value.serialize(Serializer::new())?);
        Ok(Bson::Document(doc))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ArraySerializer> {
        Ok(ArraySerializer {
            inner: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<ArraySerializer> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<ArraySerializer> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantSerializer> {
        Ok(TupleVariantSerializer {
            name: variant,
            inner: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<DocumentSerializer> {
        Ok(DocumentSerializer::default())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<DocumentSerializer> {
        Ok(DocumentSerializer::default())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<StructVariantSerializer> {
        Ok(StructVariantSerializer {
            name: variant,
            inner: DocumentSerializer::default(),
        })
    }
}

#[doc(hidden)]
pub struct ArraySerializer {
    inner: Vec<Bson>,
}

impl ser::SerializeSeq for ArraySerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.inner.push(value.serialize(Serializer::new())?);
        Ok(())
    }

    fn end(self) -> Result<Bson> {
        Ok(Bson::Array(self.inner))
    }
}

impl ser::SerializeTuple for ArraySerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Bson> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for ArraySerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Bson> {
        ser::SerializeSeq::end(self)
    }
}

#[doc(hidden)]
pub struct TupleVariantSerializer {
    name: &'static str,
    inner: Vec<Bson>,
}

impl ser::SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.inner.push(value.serialize(Serializer::new())?);
        Ok(())
    }

    fn end(self) -> Result<Bson> {
        let mut doc = Document::new();
        doc.insert(self.name, Bson::Array(self.inner));
        Ok(Bson::Document(doc))
    }
}

#[doc(hidden)]
#[derive(Default)]
pub struct DocumentSerializer {
    inner: Document,
    next_key: Option<String>,
}

impl DocumentSerializer {
    fn insert_field<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        if let Some(bson) = serialize_field_value(value)? {
            self.inner.insert(key, bson);
        }
        Ok(())
    }
}

impl ser::SerializeMap for DocumentSerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.next_key = match key.serialize(Serializer::new())? {
            Bson::String(s) => Some(s),
            other => {
                return Err(Error::InvalidDocumentKey {
                    element_type: other.element_type(),
                })
            }
        };
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = self.next_key.take().unwrap_or_default();
        self.insert_field(key, value)
    }

    fn end(self) -> Result<Bson> {
        Ok(Bson::Document(self.inner))
    }
}

impl ser::SerializeStruct for DocumentSerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.insert_field(key.to_string(), value)
    }

    fn end(self) -> Result<Bson> {
        Ok(Bson::Document(self.inner))
    }
}

#[doc(hidden)]
pub struct StructVariantSerializer {
    name: &'static str,
    inner: DocumentSerializer,
}

impl ser::SerializeStructVariant for StructVariantSerializer {
    type Ok = Bson;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.inner.insert_field(key.to_string(), value)
    }

    fn end(self) -> Result<Bson> {
        let mut doc = Document::new();
        doc.insert(self.name, Bson::Document(self.inner.inner));
        Ok(Bson::Document(doc))
    }
}
