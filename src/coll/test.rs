use std::str::FromStr;

use pretty_assertions::assert_eq;

use crate::{
    bson::Bson,
    codec,
    coll::{Collection, Namespace},
    doc,
    options::{CollectionOptions, CountOptions, ReadConcern, ReadPreference, WriteConcern},
    test::MockEngine,
};

#[test]
fn namespace_round_trip() {
    let ns = Namespace::from_str("shop.orders.archive").unwrap();
    assert_eq!(ns, Namespace::new("shop", "orders.archive"));
    assert_eq!(ns.to_string(), "shop.orders.archive");

    assert_eq!(
        codec::to_bson(&ns).unwrap(),
        Bson::String("shop.orders.archive".to_string())
    );
    let parsed: Namespace = codec::from_bson(Bson::String("a.b".to_string())).unwrap();
    assert_eq!(parsed, Namespace::new("a", "b"));

    assert!(Namespace::from_str("nodot").unwrap_err().is_invalid_argument());
    assert!(Namespace::from_str(".coll").is_err());
    assert!(codec::from_bson::<Namespace>(Bson::String("db.".to_string())).is_err());
}

#[test]
fn collection_exposes_defaults() {
    let engine = MockEngine::returning(0);
    let coll = Collection::new(
        engine,
        Namespace::new("shop", "orders"),
        CollectionOptions::builder()
            .read_concern(ReadConcern::available())
            .write_concern(WriteConcern::majority())
            .selection_criteria(ReadPreference::Primary.into())
            .build(),
    );

    assert_eq!(coll.name(), "orders");
    assert_eq!(coll.namespace().to_string(), "shop.orders");
    assert_eq!(coll.read_concern(), Some(&ReadConcern::available()));
    assert_eq!(coll.write_concern(), Some(&WriteConcern::majority()));
    assert_eq!(
        coll.selection_criteria()
            .and_then(|criteria| criteria.as_read_pref()),
        Some(&ReadPreference::Primary)
    );

    let clone = coll.clone();
    assert_eq!(clone.namespace(), coll.namespace());
}

#[test]
fn collection_options_from_document() {
    let options: CollectionOptions = codec::from_document(doc! {
        "readConcern": { "level": "snapshot" },
        "writeConcern": { "w": 2 },
        "readPreference": { "mode": "secondaryPreferred" },
    })
    .unwrap();
    assert_eq!(options.read_concern, Some(ReadConcern::snapshot()));
    assert_eq!(
        options
            .selection_criteria
            .as_ref()
            .and_then(|criteria| criteria.as_read_pref())
            .map(ReadPreference::mode),
        Some("secondaryPreferred")
    );
    assert!(options.write_concern.unwrap().is_acknowledged());
}

#[test]
fn count_options_from_document() {
    let options: CountOptions = codec::from_document(doc! {
        "limit": 3,
        "maxTimeMS": 1000,
        "hint": { "a": 1 },
        "readConcern": { "level": "local" },
    })
    .unwrap();
    assert_eq!(options.limit, Some(3));
    assert_eq!(options.max_time, Some(std::time::Duration::from_secs(1)));
    assert_eq!(options.read_concern, Some(ReadConcern::local()));
    assert_eq!(
        codec::to_document(&options).unwrap(),
        doc! { "hint": { "a": 1 }, "limit": 3_i64, "maxTimeMS": 1000 }
    );
}
