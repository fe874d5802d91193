use std::{
    collections::{hash_map::DefaultHasher, HashMap, HashSet},
    hash::{Hash, Hasher},
};

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{
    bson::{
        Binary,
        BinarySubtype,
        Bson,
        DateTime,
        Decimal128,
        Document,
        ElementType,
        JavaScriptCodeWithScope,
        ObjectId,
        Regex,
        Timestamp,
    },
    bson,
    codec,
    doc,
    error::ErrorKind,
};

fn hash_of(value: &Bson) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn dec(s: &str) -> Bson {
    Bson::Decimal128(s.parse().unwrap())
}

fn assert_same(a: Bson, b: Bson) {
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(hash_of(&a), hash_of(&b), "{:?} and {:?} hash differently", a, b);
}

#[test]
fn numeric_equality_across_kinds() {
    let ones = [
        Bson::Int32(1),
        Bson::Int64(1),
        Bson::Double(1.0),
        dec("1"),
        dec("1.000"),
        dec("0.1E1"),
    ];
    for a in &ones {
        for b in &ones {
            assert_same(a.clone(), b.clone());
        }
    }

    assert_same(Bson::Double(5.5), dec("5.5"));
    assert_same(Bson::Int64(1 << 40), Bson::Double((1u64 << 40) as f64));
    assert_same(Bson::Int32(-7), dec("-7"));
    assert_same(Bson::Int64(100), dec("1E+2"));
}

#[test]
fn numeric_inequality_across_kinds() {
    assert_ne!(Bson::Double(1.234), dec("1.234"));
    assert_ne!(Bson::Int32(1), Bson::Int64(2));
    assert_ne!(Bson::Int64(i64::MAX), Bson::Double(i64::MAX as f64));
    assert_ne!(Bson::Double(0.1), dec("0.1"));
    assert_ne!(dec("1.5"), Bson::Int32(1));

    assert_ne!(hash_of(&Bson::Int32(1)), hash_of(&Bson::Int32(2)));
}

#[test]
fn numeric_special_values() {
    assert_same(Bson::Double(0.0), Bson::Double(-0.0));
    assert_same(Bson::Double(-0.0), dec("-0"));
    assert_same(Bson::Int32(0), dec("0E+10"));

    assert_same(Bson::Double(f64::INFINITY), dec("Infinity"));
    assert_same(Bson::Double(f64::NEG_INFINITY), dec("-inf"));
    assert_ne!(Bson::Double(f64::INFINITY), dec("-Infinity"));

    assert_same(Bson::Double(f64::NAN), Bson::Double(f64::NAN));
    assert_same(Bson::Double(f64::NAN), dec("NaN"));
    assert_ne!(Bson::Double(f64::NAN), Bson::Double(f64::INFINITY));
    assert_ne!(Bson::Double(f64::NAN), Bson::Int32(0));
}

#[test]
fn other_kinds_are_never_equal() {
    assert_ne!(Bson::Int32(1), Bson::Boolean(true));
    assert_ne!(Bson::String("1".into()), Bson::Int32(1));
    assert_ne!(Bson::Null, Bson::Document(doc! {}));
    assert_ne!(
        Bson::JavaScriptCode("x".into()),
        Bson::String("x".into())
    );
    assert_ne!(Bson::MinKey, Bson::MaxKey);
}

#[test]
fn hash_map_keys_merge_equal_numbers() {
    let mut counts: HashMap<Bson, i32> = HashMap::new();
    *counts.entry(Bson::Int32(1)).or_default() += 1;
    *counts.entry(Bson::Int64(1)).or_default() += 1;
    *counts.entry(Bson::Double(1.0)).or_default() += 1;
    *counts.entry(Bson::Int32(5)).or_default() += 1;

    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&Bson::Int64(1)], 3);
    assert_eq!(counts[&dec("5")], 1);
}

#[test]
fn arrays_compare_pairwise_in_order() {
    assert_same(
        bson!([1, "two", { "three": 3.0 }]),
        Bson::Array(vec![
            Bson::Int64(1),
            Bson::String("two".into()),
            Bson::Document(doc! { "three": 3 }),
        ]),
    );
    assert_ne!(bson!([1, 2]), bson!([2, 1]));
    assert_ne!(bson!([1, 2]), bson!([1, 2, 3]));
}

#[test]
fn element_types() {
    assert_eq!(Bson::Double(1.0).element_type(), ElementType::Double);
    assert_eq!(Bson::Int32(1).element_type(), ElementType::Int32);
    assert_eq!(Bson::MinKey.element_type(), ElementType::MinKey);

    assert_eq!(ElementType::from(0x13), Some(ElementType::Decimal128));
    assert_eq!(ElementType::from(0xFF), Some(ElementType::MinKey));
    assert_eq!(ElementType::from(0x7F), Some(ElementType::MaxKey));
    assert_eq!(ElementType::from(0x06), None);
    assert_eq!(ElementType::Int64 as u8, 0x12);
}

#[test]
fn canonical_rank_orders_sentinels() {
    let values = [
        Bson::Null,
        Bson::Int32(1),
        Bson::String("s".into()),
        Bson::Document(doc! {}),
        Bson::Array(vec![]),
        Bson::Binary(Binary::generic(vec![])),
        Bson::ObjectId(ObjectId::from_bytes([0; 12])),
        Bson::Boolean(false),
        Bson::DateTime(DateTime::from_millis(0)),
        Bson::Timestamp(Timestamp {
            time: 0,
            increment: 0,
        }),
        Bson::RegularExpression(Regex::new("a", "")),
        Bson::JavaScriptCode("f()".into()),
    ];
    for value in &values {
        assert!(Bson::MinKey.canonical_rank() < value.canonical_rank());
        assert!(Bson::MaxKey.canonical_rank() > value.canonical_rank());
    }
    assert_eq!(
        Bson::Int32(1).canonical_rank(),
        dec("2.5").canonical_rank()
    );
    assert_eq!(
        Bson::Int64(1).canonical_rank(),
        Bson::Double(1.5).canonical_rank()
    );
}

#[test]
fn lossless_numeric_conversions() {
    assert_eq!(Bson::Double(3.0).to_i32(), Some(3));
    assert_eq!(Bson::Double(3.5).to_i32(), None);
    assert_eq!(Bson::Int64(i64::from(i32::MAX) + 1).to_i32(), None);
    assert_eq!(dec("42.000").to_i64(), Some(42));
    assert_eq!(Bson::Int32(7).to_f64(), Some(7.0));
    assert_eq!(Bson::Int64(i64::MAX).to_f64(), None);
    assert_eq!(dec("0.1").to_f64(), None);
    assert_eq!(dec("0.5").to_f64(), Some(0.5));
    assert_eq!(Bson::String("1".into()).to_i64(), None);

    assert_eq!(
        Bson::Double(5.5).to_decimal128(),
        Some("5.5".parse().unwrap())
    );
    assert_eq!(
        Bson::Int64(-12).to_decimal128().map(|d| d.to_string()),
        Some("-12".to_string())
    );
    assert_eq!(Bson::Boolean(true).to_decimal128(), None);
}

#[test]
fn decimal128_parse_and_format() {
    let cases = [
        ("0", "0"),
        ("-0", "-0"),
        ("1.000", "1.000"),
        ("0.001", "0.001"),
        ("0.0000001", "1E-7"),
        ("1E3", "1E+3"),
        ("+12.5e-1", "1.25"),
        ("123456789012345678901234567890123400", "1.234567890123456789012345678901234E+35"),
        ("inf", "Infinity"),
        ("-INFINITY", "-Infinity"),
        ("nan", "NaN"),
    ];
    for (input, expected) in cases {
        let parsed: Decimal128 = input.parse().unwrap();
        assert_eq!(parsed.to_string(), expected, "formatting {input:?}");
    }

    for invalid in ["", "abc", "1.2.3", "1e", "12345678901234567890123456789012345", "1E-7000"] {
        let err = invalid.parse::<Decimal128>().unwrap_err();
        assert!(
            matches!(*err.kind, ErrorKind::InvalidArgument { .. }),
            "{invalid:?} should be rejected"
        );
    }

    assert!(dec("NaN").is_number());
    assert!("NaN".parse::<Decimal128>().unwrap().is_nan());
    assert!("-Inf".parse::<Decimal128>().unwrap().is_infinite());
}

#[test]
fn uuid_binary_length_guard() {
    let err = Binary::new(vec![1, 2], BinarySubtype::Uuid).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(Binary::new(vec![1, 2], BinarySubtype::UuidOld).is_err());

    let uuid = Binary::new(vec![9; 16], BinarySubtype::Uuid).unwrap();
    assert_eq!(uuid.bytes().len(), 16);
    assert!(uuid.to_uuid().is_some());

    let generic = Binary::new(vec![1, 2], BinarySubtype::Generic).unwrap();
    assert_eq!(generic, Binary::generic(vec![1, 2]));
    assert_eq!(generic.to_uuid(), None);

    // The guard applies to the subtype byte, however it is spelled.
    assert!(Binary::new(vec![1, 2], BinarySubtype::Reserved(0x04)).is_err());
    assert!(Binary::new(vec![1, 2], BinarySubtype::UserDefined(0x03)).is_err());
    assert!(Binary::new(vec![1, 2], BinarySubtype::from(0x04)).is_err());

    let spelled = Binary::new(vec![9; 16], BinarySubtype::Reserved(0x04)).unwrap();
    assert_eq!(spelled.subtype(), BinarySubtype::Uuid);
    assert_eq!(spelled, uuid);

    let md5 = Binary::new(vec![5; 16], BinarySubtype::Md5).unwrap();
    let md5_by_byte = Binary::new(vec![5; 16], BinarySubtype::UserDefined(0x05)).unwrap();
    assert_eq!(Bson::Binary(md5_by_byte.clone()), Bson::Binary(md5.clone()));
    let mut seen = HashSet::new();
    seen.insert(Bson::Binary(md5));
    assert!(!seen.insert(Bson::Binary(md5_by_byte)));

    let decoded: Document = codec::from_document(doc! { "b": spelled.clone() }).unwrap();
    assert_eq!(decoded.get("b"), Some(&Bson::Binary(spelled)));
}

#[test]
fn object_id_hex_round_trip() {
    let hex = "507f1f77bcf86cd799439011";
    let oid = ObjectId::parse_str(hex).unwrap();
    assert_eq!(oid.to_hex(), hex);
    assert_eq!(oid.to_string(), hex);
    assert_eq!(oid.timestamp_secs(), 0x507f1f77);
    assert_eq!(
        oid.timestamp(),
        DateTime::from_millis(0x507f1f77_i64 * 1000)
    );

    let generated = ObjectId::new();
    assert_eq!(ObjectId::parse_str(generated.to_hex()).unwrap(), generated);
    assert_eq!(ObjectId::try_from(&generated.bytes()[..]).unwrap(), generated);

    assert!(ObjectId::parse_str("507f1f77").is_err());
    assert!(ObjectId::parse_str("zz7f1f77bcf86cd799439011").is_err());
    assert!(ObjectId::try_from(&[0u8; 11][..]).is_err());
}

#[test]
fn generated_object_ids_share_process_bytes() {
    let first = ObjectId::new();
    let second = ObjectId::new();
    assert_ne!(first, second);
    assert_eq!(first.bytes()[4..9], second.bytes()[4..9]);
    assert!(second.timestamp_secs() >= first.timestamp_secs());
}

#[test]
fn document_key_order() {
    let literal = doc! { "foo": 1, "bar": 2, "nested": { "x": true } };

    let mut inserted = Document::new();
    inserted.insert("foo", 1);
    inserted.insert("bar", 2);
    inserted.insert("nested", doc! { "x": true });

    let collected: Document = vec![
        ("foo", Bson::Int32(1)),
        ("bar", Bson::Int32(2)),
        ("nested", Bson::Document(doc! { "x": true })),
    ]
    .into_iter()
    .collect();

    for doc in [&literal, &inserted, &collected] {
        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys, ["foo", "bar", "nested"]);
    }
    assert_eq!(literal, inserted);
    assert_eq!(inserted, collected);
}

#[test]
fn document_insert_overwrites_in_place() {
    let mut doc = doc! { "a": 1, "b": 2, "c": 3 };
    assert_eq!(doc.insert("b", "two"), Some(Bson::Int32(2)));
    assert_eq!(doc.insert("d", 4), None);
    assert_eq!(doc, doc! { "a": 1, "b": "two", "c": 3, "d": 4 });
    assert_ne!(doc, doc! { "b": "two", "a": 1, "c": 3, "d": 4 });

    if let Some(Bson::Int32(c)) = doc.get_mut("c") {
        *c += 10;
    }
    assert_eq!(doc.get("c"), Some(&Bson::Int32(13)));
}

#[test]
fn document_remove_preserves_order() {
    let mut doc = doc! { "a": 1, "b": 2, "c": 3, "d": 4 };
    assert_eq!(doc.remove("b"), Some(Bson::Int32(2)));
    assert_eq!(doc.remove("missing"), None);
    assert!(!doc.contains_key("b"));
    assert_eq!(doc.get("d"), Some(&Bson::Int32(4)));

    doc.insert("b", 5);
    let keys: Vec<_> = doc.keys().cloned().collect();
    assert_eq!(keys, ["a", "c", "d", "b"]);
    assert_eq!(doc.len(), 4);
}

#[test]
fn document_merge() {
    let mut base = doc! { "a": 1, "b": 2 };
    base.merge(doc! { "c": 3, "a": "one" });
    assert_eq!(base, doc! { "a": "one", "b": 2, "c": 3 });
}

#[test]
fn document_clone_is_deep() {
    let original = doc! { "nested": { "list": [1, 2] } };
    let mut copy = original.clone();
    copy.insert("nested", doc! {});
    assert_eq!(original, doc! { "nested": { "list": [1, 2] } });
    assert_ne!(original, copy);
}

#[test]
fn document_iteration_is_restartable() {
    let doc = doc! { "x": 1, "y": 2 };
    assert_eq!(doc.keys().count(), 2);
    assert_eq!(doc.keys().count(), 2);
    let values: Vec<_> = doc.values().cloned().collect();
    assert_eq!(values, [Bson::Int32(1), Bson::Int32(2)]);
    let pairs: Vec<(String, Bson)> = doc.into_iter().collect();
    assert_eq!(pairs[1], ("y".to_string(), Bson::Int32(2)));
}

#[test]
fn macros_accept_expressions() {
    let key = String::from("dynamic");
    let value = 7_i64;
    let doc = doc! {
        key.clone(): value,
        "null": null,
        "list": [null, { "deep": [1.5] }],
        "oid": ObjectId::from_bytes([1; 12]),
    };
    assert_eq!(doc.get(&key), Some(&Bson::Int64(7)));
    assert_eq!(doc.get("null"), Some(&Bson::Null));
    assert_eq!(
        doc.get("list"),
        Some(&Bson::Array(vec![
            Bson::Null,
            Bson::Document(doc! { "deep": [1.5] })
        ]))
    );
    assert_eq!(bson!(null), Bson::Null);
    assert_eq!(bson!("s"), Bson::String("s".into()));
}

#[test]
fn relaxed_and_canonical_extjson() {
    let doc = doc! {
        "int": 5,
        "long": 6_i64,
        "double": 1.5,
        "decimal": "2.50".parse::<Decimal128>().unwrap(),
        "oid": ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap(),
        "date": DateTime::from_millis(0),
        "bin": Binary::generic(vec![1, 2, 3]),
        "ts": Timestamp { time: 1, increment: 2 },
        "re": Regex::new("^a", "xi"),
        "code": JavaScriptCodeWithScope { code: "f()".into(), scope: doc! { "x": 1 } },
        "min": Bson::MinKey,
    };

    assert_eq!(
        Bson::Document(doc.clone()).into_relaxed_extjson(),
        json!({
            "int": 5,
            "long": 6,
            "double": 1.5,
            "decimal": { "$numberDecimal": "2.50" },
            "oid": { "$oid": "507f1f77bcf86cd799439011" },
            "date": { "$date": "1970-01-01T00:00:00.000Z" },
            "bin": { "$binary": { "base64": "AQID", "subType": "00" } },
            "ts": { "$timestamp": { "t": 1, "i": 2 } },
            "re": { "$regularExpression": { "pattern": "^a", "options": "ix" } },
            "code": { "$code": "f()", "$scope": { "x": 1 } },
            "min": { "$minKey": 1 },
        })
    );

    let canonical = Bson::Document(doc.clone()).into_canonical_extjson();
    assert_eq!(canonical["int"], json!({ "$numberInt": "5" }));
    assert_eq!(canonical["long"], json!({ "$numberLong": "6" }));
    assert_eq!(canonical["double"], json!({ "$numberDouble": "1.5" }));
    assert_eq!(canonical["date"], json!({ "$date": { "$numberLong": "0" } }));

    assert_eq!(Bson::from_extjson(canonical), Bson::Document(doc));
}

#[test]
fn non_finite_doubles_in_extjson() {
    assert_eq!(
        Bson::Double(f64::INFINITY).into_relaxed_extjson(),
        json!({ "$numberDouble": "Infinity" })
    );
    assert_eq!(
        Bson::Double(f64::NAN).into_canonical_extjson(),
        json!({ "$numberDouble": "NaN" })
    );
}

#[test]
fn display_renders_relaxed_extjson() {
    let doc = doc! { "a": 1, "b": [true, null] };
    assert_eq!(doc.to_string(), r#"{"a":1,"b":[true,null]}"#);
    assert_eq!(Bson::String("x".into()).to_string(), r#""x""#);
}

#[test]
fn unrecognized_extended_documents_stay_documents() {
    let plain = doc! { "$oid": 5 };
    assert_eq!(
        Bson::from_extended_document(plain.clone()),
        Bson::Document(plain)
    );
    assert_eq!(
        Bson::from_extended_document(doc! { "$maxKey": 1 }),
        Bson::MaxKey
    );
}
