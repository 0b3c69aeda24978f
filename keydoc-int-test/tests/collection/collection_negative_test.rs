use keydoc::collection::Document;
use keydoc::common::MAX_KEY_LENGTH;
use keydoc::doc;
use keydoc::errors::ErrorKind;
use keydoc_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_insert_without_key_field() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let err = users.insert_one(doc! { name: "nameless" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MissingRequiredField);
            assert_eq!(users.count()?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_with_non_string_key() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            for bad in [doc! { _id: 1 }, doc! { _id: true }, doc! { _id: { a: "b" } }] {
                let err = users.insert_one(bad).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::InvalidDataType);
            }
            assert_eq!(users.count()?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unusable_keys_are_rejected() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let mut oversized = Document::new();
            oversized.put("_id", "k".repeat(MAX_KEY_LENGTH + 1))?;

            for query in [doc! { _id: "" }, oversized] {
                let err = users.insert_one(query.clone()).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError);
                let err = users.insert_many(vec![query.clone()]).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError);
                let err = users.find_one(&query).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError);
                let err = users.delete_one(&query).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError);
            }

            // the store is still usable afterwards
            let mut longest = Document::new();
            longest.put("_id", "k".repeat(MAX_KEY_LENGTH))?;
            users.insert_one(longest.clone())?;
            users.insert_one(doc! { _id: "a" })?;
            assert_eq!(users.count()?, 2);
            assert_eq!(users.find_one(&longest)?, Some(longest));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_non_finite_floats_are_rejected() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let err = users.insert_one(doc! { _id: "a", x: (f64::NAN) }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = users
                .insert_one(doc! { _id: "a", list: [1, (f64::INFINITY)] })
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            assert_eq!(users.count()?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unknown_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.db().collection("missing").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            assert!(!ctx.db().has_collection("missing"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_operations_after_close() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let users = db.collection("users")?;
            users.insert_one(doc! { _id: "a" })?;

            db.close()?;
            assert!(db.is_closed());
            assert!(!users.is_open());

            let err = db.collection("users").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);
            let err = db.commit().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);

            let err = users.insert_one(doc! { _id: "b" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);
            let err = users.find().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);
            let err = users.find_one(&doc! { _id: "a" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);
            let err = users.delete_many().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);

            // second close is a no-op
            db.close()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_json_input() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;

            let err = users.insert_one_json("{\"_id\": ").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);

            let err = users.insert_one_json("[1, 2]").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = users.insert_one_json(r#"{"_id": 12}"#).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidDataType);

            assert_eq!(users.count()?, 0);
            Ok(())
        },
        cleanup,
    )
}
