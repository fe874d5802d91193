//! Conversions between [`Bson`] and MongoDB extended JSON.

use serde_json::{json, Map, Value};

use crate::{
    bson::{
        Binary,
        BinarySubtype,
        Bson,
        DateTime,
        Decimal128,
        Document,
        JavaScriptCodeWithScope,
        ObjectId,
        Regex,
        Timestamp,
    },
    doc,
};

// Relaxed mode renders datetimes in this range as ISO-8601 strings.
const MAX_RELAXED_DATE_MILLIS: i64 = 253_402_300_799_999;

impl Bson {
    /// Converts this value into a [`serde_json::Value`] in relaxed extended JSON format.
    pub fn into_relaxed_extjson(self) -> Value {
        self.into_extjson(true)
    }

    /// Converts this value into a [`serde_json::Value`] in canonical extended JSON format.
    pub fn into_canonical_extjson(self) -> Value {
        self.into_extjson(false)
    }

    fn into_extjson(self, relaxed: bool) -> Value {
        match self {
            Bson::Double(v) if relaxed && v.is_finite() => json!(v),
            Bson::Double(v) => json!({ "$numberDouble": format_double(v) }),
            Bson::String(s) => Value::String(s),
            Bson::Array(arr) => {
                Value::Array(arr.into_iter().map(|v| v.into_extjson(relaxed)).collect())
            }
            Bson::Document(doc) => Value::Object(
                doc.into_iter()
                    .map(|(k, v)| (k, v.into_extjson(relaxed)))
                    .collect::<Map<_, _>>(),
            ),
            Bson::Boolean(b) => Value::Bool(b),
            Bson::Null => Value::Null,
            Bson::RegularExpression(Regex { pattern, options }) => json!({
                "$regularExpression": { "pattern": pattern, "options": options }
            }),
            Bson::JavaScriptCode(code) => json!({ "$code": code }),
            Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { code, scope }) => json!({
                "$code": code,
                "$scope": Bson::Document(scope).into_extjson(relaxed),
            }),
            Bson::Int32(v) if relaxed => json!(v),
            Bson::Int32(v) => json!({ "$numberInt": v.to_string() }),
            Bson::Int64(v) if relaxed => json!(v),
            Bson::Int64(v) => json!({ "$numberLong": v.to_string() }),
            Bson::Timestamp(Timestamp { time, increment }) => json!({
                "$timestamp": { "t": time, "i": increment }
            }),
            Bson::Binary(binary) => json!({
                "$binary": {
                    "base64": binary.to_base64(),
                    "subType": format!("{:02x}", u8::from(binary.subtype())),
                }
            }),
            Bson::ObjectId(oid) => json!({ "$oid": oid.to_hex() }),
            Bson::DateTime(dt)
                if relaxed && (0..=MAX_RELAXED_DATE_MILLIS).contains(&dt.timestamp_millis()) =>
            {
                match dt.try_to_rfc3339_string() {
                    Some(s) => json!({ "$date": s }),
                    None => json!({ "$date": { "$numberLong": dt.timestamp_millis().to_string() } }),
                }
            }
            Bson::DateTime(dt) => {
                json!({ "$date": { "$numberLong": dt.timestamp_millis().to_string() } })
            }
            Bson::Decimal128(d) => json!({ "$numberDecimal": d.to_string() }),
            Bson::MaxKey => json!({ "$maxKey": 1 }),
            Bson::MinKey => json!({ "$minKey": 1 }),
        }
    }

    /// The canonical extended JSON shape of the special value types as a [`Document`], or `None`
    /// for kinds that map directly onto the serde data model.
    pub(crate) fn into_extended_document(self) -> Option<Document> {
        let doc = match self {
            Bson::RegularExpression(Regex { pattern, options }) => doc! {
                "$regularExpression": { "pattern": pattern, "options": options }
            },
            Bson::JavaScriptCode(code) => doc! { "$code": code },
            Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { code, scope }) => doc! {
                "$code": code,
                "$scope": scope,
            },
            Bson::Timestamp(Timestamp { time, increment }) => doc! {
                "$timestamp": { "t": time, "i": increment }
            },
            Bson::Binary(binary) => doc! {
                "$binary": {
                    "base64": binary.to_base64(),
                    "subType": format!("{:02x}", u8::from(binary.subtype())),
                }
            },
            Bson::ObjectId(oid) => doc! { "$oid": oid.to_hex() },
            Bson::DateTime(dt) => doc! {
                "$date": { "$numberLong": dt.timestamp_millis().to_string() }
            },
            Bson::Decimal128(d) => doc! { "$numberDecimal": d.to_string() },
            Bson::MaxKey => doc! { "$maxKey": 1 },
            Bson::MinKey => doc! { "$minKey": 1 },
            _ => return None,
        };
        Some(doc)
    }

    /// Converts a document in canonical extended JSON form (e.g. `{"$oid": "..."}`) into the
    /// value it denotes. Documents that are not a recognized extended JSON shape are returned as
    /// [`Bson::Document`] unchanged.
    pub fn from_extended_document(doc: Document) -> Bson {
        parse_extended_document(&doc).unwrap_or(Bson::Document(doc))
    }

    /// Converts a [`serde_json::Value`] holding canonical or relaxed extended JSON into a
    /// [`Bson`] value. Integral JSON numbers become `Int32` when they fit and `Int64` otherwise.
    pub fn from_extjson(value: Value) -> Bson {
        match value {
            Value::Null => Bson::Null,
            Value::Bool(b) => Bson::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(v) => match i32::try_from(v) {
                    Ok(v) => Bson::Int32(v),
                    Err(_) => Bson::Int64(v),
                },
                None => Bson::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Bson::String(s),
            Value::Array(arr) => Bson::Array(arr.into_iter().map(Bson::from_extjson).collect()),
            Value::Object(map) => Bson::from_extended_document(
                map.into_iter()
                    .map(|(k, v)| (k, Bson::from_extjson(v)))
                    .collect(),
            ),
        }
    }
}

fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "Infinity".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{v:?}")
    }
}

fn parse_extended_document(doc: &Document) -> Option<Bson> {
    let mut keys = doc.keys();
    let first = keys.next()?;

    if doc.len() == 2 {
        let second = keys.next()?;
        if first == "$code" && second == "$scope" {
            return Some(Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope {
                code: doc.get_str("$code")?.to_string(),
                scope: doc.get_document("$scope")?.clone(),
            }));
        }
        return None;
    }
    if doc.len() != 1 {
        return None;
    }

    let value = doc.get(first)?;
    let bson = match first.as_str() {
        "$oid" => Bson::ObjectId(ObjectId::parse_str(value.as_str()?).ok()?),
        "$numberInt" => Bson::Int32(value.as_str()?.parse().ok()?),
        "$numberLong" => Bson::Int64(value.as_str()?.parse().ok()?),
        "$numberDouble" => Bson::Double(match value.as_str()? {
            "Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            "NaN" => f64::NAN,
            other => other.parse().ok()?,
        }),
        "$numberDecimal" => Bson::Decimal128(value.as_str()?.parse::<Decimal128>().ok()?),
        "$date" => Bson::DateTime(match value {
            Bson::String(s) => DateTime::parse_rfc3339_str(s)?,
            Bson::Document(inner) => {
                DateTime::from_millis(inner.get_str("$numberLong")?.parse().ok()?)
            }
            other => DateTime::from_millis(other.to_i64()?),
        }),
        "$binary" => {
            let inner = value.as_document()?;
            let subtype = u8::from_str_radix(inner.get_str("subType")?, 16).ok()?;
            Bson::Binary(
                Binary::from_base64(inner.get_str("base64")?, BinarySubtype::from(subtype)).ok()?,
            )
        }
        "$timestamp" => {
            let inner = value.as_document()?;
            Bson::Timestamp(Timestamp {
                time: u32::try_from(inner.get("t")?.to_i64()?).ok()?,
                increment: u32::try_from(inner.get("i")?.to_i64()?).ok()?,
            })
        }
        "$regularExpression" => {
            let inner = value.as_document()?;
            Bson::RegularExpression(Regex::new(
                inner.get_str("pattern")?,
                inner.get_str("options")?,
            ))
        }
        "$code" => Bson::JavaScriptCode(value.as_str()?.to_string()),
        "$maxKey" if value.to_i64() == Some(1) => Bson::MaxKey,
        "$minKey" if value.to_i64() == Some(1) => Bson::MinKey,
        _ => return None,
    };
    Some(bson)
}
