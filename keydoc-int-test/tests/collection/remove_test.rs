use keydoc::collection::DeleteManyResult;
use keydoc::doc;
use keydoc::errors::ErrorKind;
use keydoc_int_test::test_util::{cleanup, create_test_context, create_test_docs, run_test};

#[test]
fn test_update_and_delete_scenario() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a", test: 1 })?;
            users.insert_one(doc! { _id: "b", test: 2 })?;

            let updated = users.update_one(&doc! { _id: "a" }, &doc! { "$set": { test: 9 } })?;
            assert_eq!(updated, Some(doc! { _id: "a", test: 9 }));
            assert_eq!(users.count()?, 2);

            let deleted = users.delete_one(&doc! { _id: "b" })?.unwrap();
            assert_eq!(deleted.to_document(), doc! { deleted: "b" });
            assert_eq!(users.count()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_one_missing_key() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a" })?;

            assert_eq!(users.delete_one(&doc! { _id: "nope" })?, None);
            assert_eq!(users.count()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_one_twice() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a" })?;

            assert!(users.delete_one(&doc! { _id: "a" })?.is_some());
            assert!(users.delete_one(&doc! { _id: "a" })?.is_none());
            assert_eq!(users.find_one(&doc! { _id: "a" })?, None);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_one_rejects_bad_query() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let err = users.delete_one(&doc! {}).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MissingRequiredField);

            let err = users.delete_one(&doc! { _id: ["a"] }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidDataType);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_many_on_empty_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let result = users.delete_many()?;
            assert_eq!(result, DeleteManyResult::Empty);
            assert_eq!(result.to_document(), doc! { deleted: 0 });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_many_removes_everything() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_many(create_test_docs())?;

            let result = users.delete_many()?;
            assert_eq!(result.count(), 3);
            assert_eq!(result.to_document(), doc! { deleted: ["a", "b", "c"] });
            assert_eq!(users.count()?, 0);
            assert!(users.find()?.is_empty());

            assert_eq!(users.delete_many()?, DeleteManyResult::Empty);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_reinsert_after_delete() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a", v: 1 })?;
            users.delete_one(&doc! { _id: "a" })?;
            users.insert_one(doc! { _id: "a", v: 2 })?;
            assert_eq!(users.find_one(&doc! { _id: "a" })?, Some(doc! { _id: "a", v: 2 }));
            Ok(())
        },
        cleanup,
    )
}
