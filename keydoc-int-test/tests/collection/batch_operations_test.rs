use keydoc::doc;
use keydoc::errors::ErrorKind;
use keydoc_int_test::test_util::{cleanup, create_test_context, create_test_docs, run_test};

#[test]
fn test_insert_many_then_find() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let docs = create_test_docs();
            let operations = users.insert_many(docs.clone())?;

            assert_eq!(operations.len(), 3);
            assert!(operations.iter().all(|op| op.is_put()));
            let keys: Vec<&str> = operations.iter().map(|op| op.key()).collect();
            assert_eq!(keys, vec!["a", "b", "c"]);

            let found = users.find()?;
            assert_eq!(found.len(), 3);
            for document in &docs {
                assert!(found.contains(document));
            }
            assert_eq!(users.count()?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_empty() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            assert!(users.insert_many(vec![])?.is_empty());
            assert_eq!(users.count()?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_conflict_writes_nothing() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "b", original: true })?;

            let err = users
                .insert_many(vec![doc! { _id: "a" }, doc! { _id: "b" }, doc! { _id: "c" }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);

            assert_eq!(users.count()?, 1);
            assert_eq!(
                users.find_one(&doc! { _id: "b" })?,
                Some(doc! { _id: "b", original: true })
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_duplicate_within_batch() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let err = users
                .insert_many(vec![doc! { _id: "x", n: 1 }, doc! { _id: "x", n: 2 }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);
            assert_eq!(users.count()?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_invalid_element_writes_nothing() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let err = users
                .insert_many(vec![doc! { _id: "a" }, doc! { _id: 42 }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidDataType);

            let err = users
                .insert_many(vec![doc! { _id: "a" }, doc! { name: "keyless" }])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MissingRequiredField);

            assert_eq!(users.count()?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_json() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let operations =
                users.insert_many_json(r#"[{"_id": "j1", "n": 1}, {"_id": "j2", "n": 2}]"#)?;
            assert_eq!(operations.len(), 2);
            assert_eq!(users.find_one(&doc! { _id: "j2" })?, Some(doc! { _id: "j2", n: 2 }));

            let err = users.insert_many_json(r#"{"_id": "not an array"}"#).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = users.insert_many_json(r#"[{"_id": "j3"}, 7]"#).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = users.insert_many_json("[{").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            assert_eq!(users.count()?, 2);
            Ok(())
        },
        cleanup,
    )
}
