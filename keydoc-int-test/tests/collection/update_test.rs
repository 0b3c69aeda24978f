use keydoc::collection::Document;
use keydoc::common::Value;
use keydoc::doc;
use keydoc::errors::ErrorKind;
use keydoc_int_test::test_util::{cleanup, create_test_context, create_test_docs, run_test};

#[test]
fn test_set_adds_and_overwrites() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_many(create_test_docs())?;

            let updated = users
                .update_one(&doc! { _id: "b" }, &doc! { "$set": { x: 1, age: 28 } })?
                .unwrap();
            assert_eq!(
                updated,
                doc! { _id: "b", name: "Bob", age: 28, tags: ["dev"], x: 1 }
            );
            assert_eq!(users.find_one(&doc! { _id: "b" })?, Some(updated));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_missing_key_is_none() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            let result = users.update_one(&doc! { _id: "ghost" }, &doc! { "$set": { x: 1 } })?;
            assert_eq!(result, None);
            assert_eq!(users.count()?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unset_sentinel_table() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;

            let sentinels = vec![
                ("zero", Value::I64(0), true),
                ("one", Value::I64(1), false),
                ("one_float", Value::F64(1.0), false),
                ("bool", Value::Bool(true), true),
                ("text", Value::from("1"), true),
                ("undefined", Value::Undefined, true),
            ];

            for (key, sentinel, kept) in sentinels {
                users.insert_one(doc! { _id: key, f: "value", other: 2 })?;

                let mut payload = Document::new();
                payload.put("f", sentinel)?;
                let mut modifier = Document::new();
                modifier.put("$unset", payload)?;

                let mut query = Document::new();
                query.put("_id", key)?;
                let updated = users.update_one(&query, &modifier)?.unwrap();
                assert_eq!(updated.contains_key("f"), kept, "sentinel case {}", key);
                assert_eq!(updated.get("other"), Some(&Value::I64(2)));

                let stored = users.find_one(&query)?.unwrap();
                assert_eq!(stored, updated);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_set_skips_undefined_values() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a", keep: "me" })?;

            let mut payload = doc! { added: true };
            payload.put("keep", Value::Undefined)?;
            let mut modifier = Document::new();
            modifier.put("$set", payload)?;

            let updated = users.update_one(&doc! { _id: "a" }, &modifier)?.unwrap();
            assert_eq!(updated, doc! { _id: "a", keep: "me", added: true });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_operator_order_decides_conflicts() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a", f: 0 })?;
            users.insert_one(doc! { _id: "b", f: 0 })?;

            let set_then_unset = doc! { "$set": { f: 5 }, "$unset": { f: 1 } };
            let updated = users.update_one(&doc! { _id: "a" }, &set_then_unset)?.unwrap();
            assert!(!updated.contains_key("f"));

            let unset_then_set = doc! { "$unset": { f: 1 }, "$set": { f: 5 } };
            let updated = users.update_one(&doc! { _id: "b" }, &unset_then_set)?.unwrap();
            assert_eq!(updated.get("f"), Some(&Value::I64(5)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unknown_operators_are_ignored() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a", n: 1 })?;

            let modifier = doc! { "$inc": { n: 1 }, plain: "field" };
            let updated = users.update_one(&doc! { _id: "a" }, &modifier)?.unwrap();
            assert_eq!(updated, doc! { _id: "a", n: 1 });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_key_field_cannot_change() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().collection("users")?;
            users.insert_one(doc! { _id: "a", n: 1 })?;

            let err = users
                .update_one(&doc! { _id: "a" }, &doc! { "$set": { _id: "b", n: 2 } })
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = users
                .update_one(&doc! { _id: "a" }, &doc! { "$unset": { _id: 1 } })
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            assert_eq!(users.find_one(&doc! { _id: "a" })?, Some(doc! { _id: "a", n: 1 }));
            assert_eq!(users.find_one(&doc! { _id: "b" })?, None);

            // setting the key to its current value is allowed
            let updated = users.update_one(&doc! { _id: "a" }, &doc! { "$set": { _id: "a" } })?;
            assert_eq!(updated, Some(doc! { _id: "a", n: 1 }));
            Ok(())
        },
        cleanup,
    )
}
