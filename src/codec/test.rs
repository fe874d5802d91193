use std::collections::HashMap;

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

use crate::{
    bson::{Binary, BinarySubtype, Bson, DateTime, Decimal128, Document, ObjectId, Regex, Timestamp},
    codec::{
        self,
        de::DecodingErrorKind,
        from_bson,
        from_document,
        ser,
        to_bson,
        to_document,
        Path,
        PathSegment,
    },
    doc,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Everything {
    small: i8,
    medium: i16,
    int32: i32,
    int64: i64,
    unsigned: u32,
    double: f64,
    flag: bool,
    name: String,
    tags: Vec<String>,
    nested: Inner,
    #[serde(with = "serde_bytes")]
    payload: Vec<u8>,
    oid: ObjectId,
    created: DateTime,
    price: Decimal128,
    uuid: Binary,
    ts: Timestamp,
    pattern: Regex,
    raw: Document,
    any: Bson,
    maybe: Option<i32>,
    counts: HashMap<String, i64>,
    shape: Shape,
    status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Inner {
    a: i32,
    b: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Shape {
    Circle { radius: f64 },
    Square(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Status {
    Active,
    Retired,
}

fn everything() -> Everything {
    Everything {
        small: -3,
        medium: 300,
        int32: 42,
        int64: 1 << 40,
        unsigned: u32::MAX,
        double: 2.5,
        flag: true,
        name: "widget".to_string(),
        tags: vec!["a".to_string(), "b".to_string()],
        nested: Inner {
            a: 1,
            b: Some("x".to_string()),
        },
        payload: vec![1, 2, 3],
        oid: ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap(),
        created: DateTime::from_millis(1_600_000_000_123),
        price: "19.99".parse().unwrap(),
        uuid: Binary::new(vec![7; 16], BinarySubtype::Uuid).unwrap(),
        ts: Timestamp {
            time: 12,
            increment: 3,
        },
        pattern: Regex::new("^a", "xi"),
        raw: doc! { "k": [1, { "deep": null }] },
        any: Bson::MinKey,
        maybe: None,
        counts: HashMap::from([("one".to_string(), 1)]),
        shape: Shape::Circle { radius: 1.5 },
        status: Status::Active,
    }
}

#[test]
fn round_trip_every_supported_field_type() {
    let original = everything();
    let encoded = to_document(&original).unwrap();

    assert_eq!(encoded.get("small"), Some(&Bson::Int32(-3)));
    assert_eq!(encoded.get("unsigned"), Some(&Bson::Int64(u32::MAX.into())));
    assert_eq!(
        encoded.get("payload"),
        Some(&Bson::Binary(Binary::generic(vec![1, 2, 3])))
    );
    assert_eq!(
        encoded.get("oid"),
        Some(&Bson::ObjectId(original.oid))
    );
    assert_eq!(
        encoded.get("created"),
        Some(&Bson::DateTime(original.created))
    );
    assert_eq!(encoded.get("any"), Some(&Bson::MinKey));
    assert_eq!(encoded.get("status"), Some(&Bson::String("Active".into())));
    assert_eq!(
        encoded.get("shape"),
        Some(&Bson::Document(doc! { "Circle": { "radius": 1.5 } }))
    );
    assert!(!encoded.contains_key("maybe"));

    let decoded: Everything = from_document(encoded.clone()).unwrap();
    assert_eq!(decoded, original);
    assert_eq!(to_document(&decoded).unwrap(), encoded);
}

#[test]
fn field_order_follows_declaration() {
    let encoded = to_document(&everything()).unwrap();
    let keys: Vec<_> = encoded.keys().take(4).collect();
    assert_eq!(keys, ["small", "medium", "int32", "int64"]);
}

#[test]
fn none_fields_are_omitted() {
    let inner = Inner { a: 5, b: None };
    assert_eq!(to_document(&inner).unwrap(), doc! { "a": 5 });

    let decoded: Inner = from_document(doc! { "a": 5 }).unwrap();
    assert_eq!(decoded, inner);
}

#[test]
fn none_outside_fields_is_null() {
    let values: Vec<Option<i32>> = vec![Some(1), None];
    assert_eq!(
        to_bson(&values).unwrap(),
        Bson::Array(vec![Bson::Int32(1), Bson::Null])
    );
    assert_eq!(to_bson(&Option::<i32>::None).unwrap(), Bson::Null);
}

#[test]
fn none_as_null_opt_in() {
    #[derive(Serialize)]
    struct Update {
        #[serde(serialize_with = "codec::serialize_none_as_null")]
        expires: Option<i64>,
        other: Option<i64>,
    }

    let doc = to_document(&Update {
        expires: None,
        other: None,
    })
    .unwrap();
    assert_eq!(doc, doc! { "expires": null });

    let doc = to_document(&Update {
        expires: Some(4),
        other: Some(5),
    })
    .unwrap();
    assert_eq!(doc, doc! { "expires": 4_i64, "other": 5_i64 });
}

#[test]
fn serde_attributes_are_honored() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Renamed {
        #[serde(rename = "_id")]
        id: i32,
        #[serde(skip)]
        cache: Option<String>,
        #[serde(skip_serializing, default)]
        secret: String,
        #[serde(flatten)]
        extra: Inner,
        #[serde(alias = "legacyName", default)]
        label: String,
    }

    let value = Renamed {
        id: 1,
        cache: Some("ignored".into()),
        secret: "hidden".into(),
        extra: Inner { a: 2, b: None },
        label: "l".into(),
    };
    let doc = to_document(&value).unwrap();
    assert_eq!(doc, doc! { "_id": 1, "a": 2, "label": "l" });

    let decoded: Renamed =
        from_document(doc! { "_id": 1, "a": 2, "legacyName": "old" }).unwrap();
    assert_eq!(decoded.label, "old");
    assert_eq!(decoded.cache, None);
    assert_eq!(decoded.secret, "");
}

#[test]
fn missing_field_reports_path() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        nested: Vec<Inner>,
    }

    let err = from_document::<Outer>(doc! { "nested": [{ "a": 1 }, { "b": "x" }] }).unwrap_err();
    assert_eq!(
        err.kind,
        DecodingErrorKind::MissingField {
            field: "a".to_string()
        }
    );
    assert_eq!(
        err.path,
        Path::from_iter([
            PathSegment::Key("nested".to_string()),
            PathSegment::Index(1),
            PathSegment::Key("a".to_string()),
        ])
    );
    assert_eq!(err.path.to_string(), "nested[1].a");
    assert_eq!(err.to_string(), "missing field `a` at `nested[1].a`");
}

#[test]
fn type_mismatch_reports_path() {
    let err = from_document::<Inner>(doc! { "a": "one" }).unwrap_err();
    assert!(matches!(err.kind, DecodingErrorKind::TypeMismatch { .. }));
    assert_eq!(err.path.to_string(), "a");

    let err = from_bson::<i32>(Bson::String("x".into())).unwrap_err();
    assert!(err.path.is_empty());
}

#[test]
fn custom_decoder_errors_keep_their_message() {
    #[derive(Debug)]
    struct Even(i32);

    impl<'de> Deserialize<'de> for Even {
        fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let v = i32::deserialize(d)?;
            if v % 2 != 0 {
                return Err(serde::de::Error::custom("odd number"));
            }
            Ok(Even(v))
        }
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Holder {
        value: Even,
    }

    let err = from_document::<Holder>(doc! { "value": 3 }).unwrap_err();
    assert_eq!(
        err.kind,
        DecodingErrorKind::Custom {
            message: "odd number".to_string()
        }
    );
    assert_eq!(err.path.to_string(), "value");
}

#[test]
fn numeric_widening_on_decode() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Numbers {
        wide: i64,
        float: f64,
    }

    let decoded: Numbers = from_document(doc! { "wide": 5, "float": 2_i64 }).unwrap();
    assert_eq!(
        decoded,
        Numbers {
            wide: 5,
            float: 2.0
        }
    );
}

#[test]
fn encode_failures() {
    assert_eq!(
        to_bson(&u64::MAX).unwrap_err(),
        ser::Error::UnsignedIntegerExceededRange { value: u64::MAX }
    );

    let keyed: HashMap<i32, i32> = HashMap::from([(1, 2)]);
    assert!(matches!(
        to_bson(&keyed).unwrap_err(),
        ser::Error::InvalidDocumentKey { .. }
    ));

    assert!(matches!(
        to_document(&5).unwrap_err(),
        ser::Error::NotADocument { .. }
    ));
}

#[test]
fn special_types_through_serde_json() {
    let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
    let json = serde_json::to_value(oid).unwrap();
    assert_eq!(json, serde_json::json!({ "$oid": "507f1f77bcf86cd799439011" }));
    let back: ObjectId = serde_json::from_value(json).unwrap();
    assert_eq!(back, oid);

    let dt = DateTime::from_millis(1_000);
    let json = serde_json::to_value(dt).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "$date": { "$numberLong": "1000" } })
    );
    let back: DateTime = serde_json::from_value(json).unwrap();
    assert_eq!(back, dt);
}
