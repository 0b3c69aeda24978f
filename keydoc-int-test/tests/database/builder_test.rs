use keydoc::collection::{CollectionConfig, WritePolicy};
use keydoc::doc;
use keydoc::errors::ErrorKind;
use keydoc::keydoc::Keydoc;
use keydoc_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_open_without_collections() {
    let err = Keydoc::builder().open_or_create().err().unwrap();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[test]
fn test_invalid_collection_names() {
    for name in ["", "user_s", "users1", "my users", "ümlaut"] {
        let err = Keydoc::builder()
            .collection(name, CollectionConfig::new("_id"))
            .open_or_create()
            .err()
            .unwrap();
        assert_eq!(err.kind(), &ErrorKind::ValidationError, "name {:?}", name);
    }
}

#[test]
fn test_empty_key_field() {
    let err = Keydoc::builder()
        .collection("users", CollectionConfig::new(""))
        .open_or_create()
        .err()
        .unwrap();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[test]
fn test_duplicate_collection() {
    let err = Keydoc::builder()
        .collection("users", CollectionConfig::new("_id"))
        .collection("users", CollectionConfig::new("email"))
        .open_or_create()
        .err()
        .unwrap();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[test]
fn test_collections_from_json() {
    let db = Keydoc::builder()
        .collections_json(
            r#"{"users": {"key": "_id"}, "orders": {"key": "orderId", "write_policy": "serialized"}}"#,
        )
        .open_or_create()
        .unwrap();

    assert_eq!(db.collection_names(), vec!["users", "orders"]);
    let orders = db.collection("orders").unwrap();
    assert_eq!(orders.key_field(), "orderId");
    assert_eq!(orders.config().policy(), WritePolicy::Serialized);
    assert_eq!(
        db.collection("users").unwrap().config().policy(),
        WritePolicy::Snapshot
    );
    db.close().unwrap();
}

#[test]
fn test_collections_from_bad_json() {
    let err = Keydoc::builder()
        .collections_json(r#"{"users": {"id": "_id"}}"#)
        .open_or_create()
        .err()
        .unwrap();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);

    let err = Keydoc::builder()
        .collections_json("not json")
        .open_or_create()
        .err()
        .unwrap();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[test]
fn test_collection_names_and_handles() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert_eq!(db.collection_names(), vec!["users", "orders"]);
            assert!(db.has_collection("users"));
            assert!(!db.has_collection("Users"));

            // handles of the same name share state
            let first = db.collection("users")?;
            let second = db.collection("users")?;
            first.insert_one(doc! { _id: "shared" })?;
            assert_eq!(second.count()?, 1);
            assert_eq!(first.name(), "users");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_commit_on_open_database() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a" })?;
            ctx.db().commit()?;
            assert!(!ctx.db().is_closed());
            Ok(())
        },
        cleanup,
    )
}
