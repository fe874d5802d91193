//! `serde` implementations for the BSON value types.

use std::fmt;

use serde::{
    de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor},
    ser::{self, Serialize, SerializeMap, Serializer},
};

use crate::bson::{
    Binary,
    Bson,
    DateTime,
    Decimal128,
    Document,
    JavaScriptCodeWithScope,
    ObjectId,
    Regex,
    Timestamp,
};

/// Newtype name marking a value serialized in its extended JSON document shape. The codec
/// serializer turns such documents back into the value they denote.
pub(crate) const EXTENDED_JSON_NEWTYPE: &str = "$__mongodb_core_private_extjson";

impl Serialize for Bson {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Bson::Double(v) => serializer.serialize_f64(*v),
            Bson::String(v) => serializer.serialize_str(v),
            Bson::Array(v) => v.serialize(serializer),
            Bson::Document(v) => v.serialize(serializer),
            Bson::Boolean(v) => serializer.serialize_bool(*v),
            Bson::Null => serializer.serialize_unit(),
            Bson::Int32(v) => serializer.serialize_i32(*v),
            Bson::Int64(v) => serializer.serialize_i64(*v),
            other => match other.clone().into_extended_document() {
                Some(doc) => serializer.serialize_newtype_struct(EXTENDED_JSON_NEWTYPE, &doc),
                None => Err(ser::Error::custom(format!(
                    "no extended JSON representation for {}",
                    other.element_type()
                ))),
            },
        }
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            state.serialize_entry(k, v)?;
        }
        state.end()
    }
}

macro_rules! serialize_as_bson {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    Bson::from(self.clone()).serialize(serializer)
                }
            }
        )+
    };
}

serialize_as_bson!(
    ObjectId,
    DateTime,
    Binary,
    Decimal128,
    Timestamp,
    Regex,
    JavaScriptCodeWithScope,
);

struct BsonVisitor;

impl<'de> Visitor<'de> for BsonVisitor {
    type Value = Bson;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a BSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Bson, E> {
        Ok(Bson::Boolean(v))
    }

    fn visit_i8<E: de::Error>(self, v: i8) -> Result<Bson, E> {
        Ok(Bson::Int32(v.into()))
    }

    fn visit_i16<E: de::Error>(self, v: i16) -> Result<Bson, E> {
        Ok(Bson::Int32(v.into()))
    }

    fn visit_i32<E: de::Error>(self, v: i32) -> Result<Bson, E> {
        Ok(Bson::Int32(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Bson, E> {
        Ok(Bson::Int64(v))
    }

    fn visit_u8<E: de::Error>(self, v: u8) -> Result<Bson, E> {
        Ok(Bson::Int32(v.into()))
    }

    fn visit_u16<E: de::Error>(self, v: u16) -> Result<Bson, E> {
        Ok(Bson::Int32(v.into()))
    }

    fn visit_u32<E: de::Error>(self, v: u32) -> Result<Bson, E> {
        Ok(Bson::Int64(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Bson, E> {
        i64::try_from(v)
            .map(Bson::Int64)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &"an integer fitting in i64"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Bson, E> {
        Ok(Bson::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Bson, E> {
        Ok(Bson::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Bson, E> {
        Ok(Bson::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Bson, E> {
        Ok(Bson::Binary(Binary::generic(v)))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Bson, E> {
        Ok(Bson::Binary(Binary::generic(v)))
    }

    fn visit_none<E: de::Error>(self) -> Result<Bson, E> {
        Ok(Bson::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Bson, E> {
        Ok(Bson::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Bson, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Bson, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Bson, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut arr = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element()? {
            arr.push(value);
        }
        Ok(Bson::Array(arr))
    }

    fn visit_map<A>(self, map: A) -> Result<Bson, A::Error>
    where
        A: MapAccess<'de>,
    {
        let doc = DocumentVisitor.visit_map(map)?;
        Ok(Bson::from_extended_document(doc))
    }
}

impl<'de> Deserialize<'de> for Bson {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BsonVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a document")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Document, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut doc = Document::new();
        while let Some((key, value)) = map.next_entry::<String, Bson>()? {
            doc.insert(key, value);
        }
        Ok(doc)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

fn unexpected<E: de::Error>(found: &Bson, expected: &str) -> E {
    E::invalid_type(
        Unexpected::Other(&found.element_type().to_string()),
        &expected,
    )
}

macro_rules! deserialize_from_bson {
    ($($ty:ty => $expected:literal, |$bson:ident| $extract:expr;)+) => {
        $(
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let $bson = Bson::deserialize(deserializer)?;
                    match $extract {
                        Some(value) => Ok(value),
                        None => Err(unexpected(&$bson, $expected)),
                    }
                }
            }
        )+
    };
}

deserialize_from_bson! {
    ObjectId => "an ObjectId", |bson| match &bson {
        Bson::ObjectId(oid) => Some(*oid),
        Bson::String(s) => ObjectId::parse_str(s).ok(),
        _ => None,
    };
    DateTime => "a datetime", |bson| match &bson {
        Bson::DateTime(dt) => Some(*dt),
        _ => None,
    };
    Binary => "binary data", |bson| match &bson {
        Bson::Binary(binary) => Some(binary.clone()),
        _ => None,
    };
    Decimal128 => "a decimal128", |bson| match &bson {
        Bson::Decimal128(d) => Some(*d),
        _ => None,
    };
    Timestamp => "a timestamp", |bson| match &bson {
        Bson::Timestamp(ts) => Some(*ts),
        _ => None,
    };
    Regex => "a regular expression", |bson| match &bson {
        Bson::RegularExpression(regex) => Some(regex.clone()),
        _ => None,
    };
    JavaScriptCodeWithScope => "JavaScript code with scope", |bson| match &bson {
        Bson::JavaScriptCodeWithScope(code) => Some(code.clone()),
        _ => None,
    };
}
