use keydoc::common::Value;
use keydoc::doc;
use keydoc::errors::ErrorKind;
use keydoc_int_test::test_util::{cleanup, create_test_context, create_test_docs, run_test};

#[test]
fn test_insert_then_find_one() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            for document in create_test_docs() {
                let inserted = users.insert_one(document.clone())?;
                assert_eq!(inserted, document);

                let key = document.get("_id").unwrap().clone();
                let mut query = doc! {};
                query.put("_id", key)?;
                assert_eq!(users.find_one(&query)?, Some(document));
            }
            assert_eq!(users.count()?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_duplicate_keeps_first() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a", version: 1 })?;

            let err = users.insert_one(doc! { _id: "a", version: 2 }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);

            let stored = users.find_one(&doc! { _id: "a" })?.unwrap();
            assert_eq!(stored.get("version"), Some(&Value::I64(1)));
            assert_eq!(users.count()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_preserves_field_order_and_types() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! {
                _id: "typed",
                flag: true,
                count: 7,
                ratio: 0.25,
                nothing: null,
                list: [1, "two", 3.5],
                nested: { inner: { deep: "yes" } }
            })?;

            let stored = users.find_one(&doc! { _id: "typed" })?.unwrap();
            assert_eq!(
                stored.fields(),
                vec!["_id", "flag", "count", "ratio", "nothing", "list", "nested"]
            );
            assert_eq!(stored.get("flag"), Some(&Value::Bool(true)));
            assert_eq!(stored.get("count"), Some(&Value::I64(7)));
            assert_eq!(stored.get("ratio"), Some(&Value::F64(0.25)));
            assert_eq!(stored.get("nothing"), Some(&Value::Null));
            assert_eq!(
                stored.get("nested"),
                Some(&Value::from(doc! { inner: { deep: "yes" } }))
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_one_json() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let inserted = users.insert_one_json(r#"{"_id": "j", "score": 12, "tags": ["x"]}"#)?;
            assert_eq!(inserted, doc! { _id: "j", score: 12, tags: ["x"] });
            assert_eq!(users.find_one(&doc! { _id: "j" })?, Some(inserted));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_into_custom_key_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let orders = ctx.db().collection("orders")?;
            orders.insert_one(doc! { orderId: "o-1", total: 10.5 })?;

            let found = orders.find_one(&doc! { orderId: "o-1" })?;
            assert_eq!(found, Some(doc! { orderId: "o-1", total: 10.5 }));

            let err = orders.insert_one(doc! { _id: "o-2" }).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MissingRequiredField);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_undefined_fields_are_not_stored() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let mut address = doc! { city: "Oslo" };
            address.put("zip", Value::Undefined)?;
            let mut document = doc! { _id: "a" };
            document.put("gone", Value::Undefined)?;
            document.put("address", address)?;
            document.put("list", Value::Array(vec![Value::from(1), Value::Undefined]))?;

            let expected = doc! { _id: "a", address: { city: "Oslo" }, list: [1, null] };
            assert_eq!(users.insert_one(document)?, expected);
            assert_eq!(users.find_one(&doc! { _id: "a" })?, Some(expected.clone()));
            assert_eq!(users.find()?, vec![expected]);
            Ok(())
        },
        cleanup,
    )
}
