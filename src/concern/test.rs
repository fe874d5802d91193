use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::{
    bson::{Bson, Document},
    codec,
    concern::{append_if_needed, Concern},
    doc,
    error::ErrorKind,
    options::{Acknowledgment, ReadConcern, ReadConcernLevel, WriteConcern},
};

#[test]
fn write_concern_is_acknowledged() {
    let w_1 = WriteConcern::builder()
        .w(Acknowledgment::Nodes(1))
        .journal(false)
        .build();
    assert!(w_1.is_acknowledged());

    let w_majority = WriteConcern::builder()
        .w(Acknowledgment::Majority)
        .journal(false)
        .build();
    assert!(w_majority.is_acknowledged());

    let w_0 = WriteConcern::builder()
        .w(Acknowledgment::Nodes(0))
        .journal(false)
        .build();
    assert!(!w_0.is_acknowledged());

    let w_0 = WriteConcern::builder().w(Acknowledgment::Nodes(0)).build();
    assert!(!w_0.is_acknowledged());

    let empty = WriteConcern::builder().build();
    assert!(empty.is_acknowledged());

    let empty = WriteConcern::builder().journal(true).build();
    assert!(empty.is_acknowledged());
}

#[test]
fn write_concern_deserialize() {
    let wc: WriteConcern = codec::from_bson(Bson::Document(doc! { "w": 1 })).unwrap();
    assert_eq!(
        wc,
        WriteConcern {
            w: Acknowledgment::Nodes(1).into(),
            w_timeout: None,
            journal: None
        }
    );

    let wc: WriteConcern = codec::from_bson(Bson::Document(doc! { "w": "majority" })).unwrap();
    assert_eq!(wc, WriteConcern::majority());

    let wc: WriteConcern =
        codec::from_document(doc! { "w": "myTag", "wtimeout": 100, "j": true }).unwrap();
    assert_eq!(
        wc,
        WriteConcern {
            w: Acknowledgment::Custom("myTag".to_string()).into(),
            w_timeout: Some(Duration::from_millis(100)),
            journal: Some(true)
        }
    );
}

#[test]
fn write_concern_serialize() {
    let wc = WriteConcern::builder()
        .w(Acknowledgment::Majority)
        .w_timeout(Duration::from_millis(250))
        .journal(true)
        .build();
    assert_eq!(
        codec::to_document(&wc).unwrap(),
        doc! { "w": "majority", "wtimeout": 250, "j": true }
    );
    assert_eq!(
        codec::to_document(&WriteConcern::default()).unwrap(),
        Document::new()
    );
}

#[test]
fn invalid_write_concern() {
    let wc = WriteConcern::builder()
        .w(Acknowledgment::Nodes(0))
        .journal(true)
        .build();
    let err = wc.validate().unwrap_err();
    assert!(matches!(*err.kind, ErrorKind::InvalidArgument { .. }));

    let mut doc = Document::new();
    let err = wc.append_to(&mut doc).unwrap_err();
    assert!(matches!(*err.kind, ErrorKind::ConcernAppend { .. }));
    assert!(doc.is_empty());
}

#[test]
fn read_concern_levels() {
    assert_eq!(ReadConcern::new().level(), None);
    assert_eq!(
        ReadConcern::majority().level(),
        Some(&ReadConcernLevel::Majority)
    );
    assert_eq!(ReadConcern::custom("majority"), ReadConcern::majority());
    assert_eq!(
        ReadConcernLevel::Custom("snapshot".to_string()),
        ReadConcernLevel::Snapshot
    );
    assert_ne!(ReadConcern::local(), ReadConcern::available());
    assert_ne!(ReadConcern::new(), ReadConcern::linearizable());
    assert_eq!(ReadConcern::new(), ReadConcern::default());
}

#[test]
fn read_concern_clone_is_independent() {
    let original = ReadConcern::snapshot();
    let copy = original.clone();
    drop(original);
    assert_eq!(copy.level().map(ReadConcernLevel::as_str), Some("snapshot"));
}

#[test]
fn read_concern_from_document() {
    let rc = ReadConcern::from(&doc! { "level": "majority" });
    assert_eq!(rc, ReadConcern::majority());

    let rc = ReadConcern::from(&doc! {});
    assert!(rc.is_default());

    let rc = ReadConcern::from(&doc! { "level": "future" });
    assert_eq!(rc.level(), Some(&ReadConcernLevel::Custom("future".into())));

    let rc = ReadConcern::from(&doc! { "level": 5 });
    assert!(rc.is_default());
    assert_eq!(rc, ReadConcern::new());
}

#[test]
fn read_concern_display() {
    assert_eq!(ReadConcern::majority().to_string(), r#"{"level":"majority"}"#);
    assert_eq!(ReadConcern::new().to_string(), "{}");
}

#[test]
fn append_default_concern_as_empty_document() {
    let mut doc = doc! { "count": "coll" };
    ReadConcern::new().append_to(&mut doc).unwrap();
    assert_eq!(doc, doc! { "count": "coll", "readConcern": {} });
}

#[test]
fn append_if_needed_without_concern_returns_base() {
    let base = Some(doc! { "skip": 1 });
    assert_eq!(
        append_if_needed::<ReadConcern>(None, base.clone(), Some(&ReadConcern::majority()))
            .unwrap(),
        base
    );
    assert_eq!(append_if_needed::<ReadConcern>(None, None, None).unwrap(), None);
}

#[test]
fn append_if_needed_default_over_default_is_omitted() {
    assert_eq!(
        append_if_needed(Some(&ReadConcern::new()), None, Some(&ReadConcern::new())).unwrap(),
        None
    );
    assert_eq!(
        append_if_needed(Some(&ReadConcern::new()), None, None).unwrap(),
        None
    );

    let base = Some(doc! { "limit": 2 });
    assert_eq!(
        append_if_needed(Some(&ReadConcern::new()), base.clone(), None).unwrap(),
        base
    );
}

#[test]
fn append_if_needed_explicit_concern_is_appended() {
    assert_eq!(
        append_if_needed(
            Some(&ReadConcern::majority()),
            None,
            Some(&ReadConcern::new())
        )
        .unwrap(),
        Some(doc! { "readConcern": { "level": "majority" } })
    );

    assert_eq!(
        append_if_needed(
            Some(&ReadConcern::local()),
            Some(doc! { "limit": 2 }),
            Some(&ReadConcern::majority())
        )
        .unwrap(),
        Some(doc! { "limit": 2, "readConcern": { "level": "local" } })
    );
}

#[test]
fn append_if_needed_default_overriding_inherited_is_appended() {
    assert_eq!(
        append_if_needed(
            Some(&ReadConcern::new()),
            None,
            Some(&ReadConcern::majority())
        )
        .unwrap(),
        Some(doc! { "readConcern": {} })
    );
}

#[test]
fn append_if_needed_write_concern() {
    assert_eq!(
        append_if_needed(
            Some(&WriteConcern::majority()),
            None,
            Some(&WriteConcern::default())
        )
        .unwrap(),
        Some(doc! { "writeConcern": { "w": "majority" } })
    );
    assert_eq!(
        append_if_needed(
            Some(&WriteConcern::default()),
            Some(doc! {}),
            None
        )
        .unwrap(),
        Some(doc! {})
    );

    let invalid = WriteConcern::builder()
        .w(Acknowledgment::Nodes(0))
        .journal(true)
        .build();
    let err = append_if_needed(Some(&invalid), None, None).unwrap_err();
    assert!(matches!(*err.kind, ErrorKind::ConcernAppend { .. }));
}
