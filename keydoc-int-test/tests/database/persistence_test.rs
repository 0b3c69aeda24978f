#![cfg(all(feature = "fjall", not(feature = "memory")))]

use keydoc::collection::CollectionConfig;
use keydoc::doc;
use keydoc::errors::ErrorKind;
use keydoc::keydoc::Keydoc;
use keydoc_fjall_adapter::FjallModule;
use keydoc_int_test::test_util::{
    create_test_docs, open_fjall_database, random_path, remove_path,
};

#[test]
fn test_documents_survive_reopen() {
    let path = random_path();
    {
        let db = open_fjall_database(&path).unwrap();
        let users = db.collection("users").unwrap();
        users.insert_many(create_test_docs()).unwrap();
        users
            .update_one(&doc! { _id: "b" }, &doc! { "$set": { age: 28 } })
            .unwrap();
        users.delete_one(&doc! { _id: "c" }).unwrap();
        db.collection("orders")
            .unwrap()
            .insert_one(doc! { orderId: "o-1", total: 3.5 })
            .unwrap();
        db.close().unwrap();
    }

    {
        let db = open_fjall_database(&path).unwrap();
        let users = db.collection("users").unwrap();
        assert_eq!(users.count().unwrap(), 2);
        let bob = users.find_one(&doc! { _id: "b" }).unwrap().unwrap();
        assert_eq!(bob.get("age"), Some(&28.into()));
        assert_eq!(users.find_one(&doc! { _id: "c" }).unwrap(), None);

        let expected = create_test_docs().remove(0);
        assert_eq!(users.find_one(&doc! { _id: "a" }).unwrap(), Some(expected));

        let orders = db.collection("orders").unwrap();
        assert_eq!(
            orders.find_one(&doc! { orderId: "o-1" }).unwrap(),
            Some(doc! { orderId: "o-1", total: 3.5 })
        );
        db.close().unwrap();
    }
    remove_path(&path);
}

#[test]
fn test_drop_without_close_keeps_writes() {
    let path = random_path();
    {
        let db = open_fjall_database(&path).unwrap();
        db.collection("users")
            .unwrap()
            .insert_one(doc! { _id: "dropped" })
            .unwrap();
    }

    let db = open_fjall_database(&path).unwrap();
    let users = db.collection("users").unwrap();
    assert!(users.find_one(&doc! { _id: "dropped" }).unwrap().is_some());
    db.close().unwrap();
    remove_path(&path);
}

#[test]
fn test_create_if_missing_off() {
    let path = random_path();
    let err = Keydoc::builder()
        .collection("users", CollectionConfig::new("_id"))
        .load_module(
            FjallModule::with_config()
                .db_path(&path)
                .create_if_missing(false)
                .build(),
        )
        .open_or_create()
        .err()
        .unwrap();
    assert_eq!(err.kind(), &ErrorKind::IOError);
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_error_if_exists() {
    let path = random_path();
    open_fjall_database(&path).unwrap().close().unwrap();

    let err = Keydoc::builder()
        .collection("users", CollectionConfig::new("_id"))
        .load_module(
            FjallModule::with_config()
                .db_path(&path)
                .error_if_exists(true)
                .build(),
        )
        .open_or_create()
        .err()
        .unwrap();
    assert_eq!(err.kind(), &ErrorKind::IOError);
    remove_path(&path);
}

#[test]
fn test_missing_db_path() {
    let err = Keydoc::builder()
        .collection("users", CollectionConfig::new("_id"))
        .load_module(FjallModule::with_config().build())
        .open_or_create()
        .err()
        .unwrap();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[test]
fn test_new_collection_on_existing_keyspace() {
    let path = random_path();
    open_fjall_database(&path).unwrap().close().unwrap();

    let db = Keydoc::builder()
        .collection("users", CollectionConfig::new("_id"))
        .collection("audit", CollectionConfig::new("event"))
        .load_module(FjallModule::with_config().db_path(&path).build())
        .open_or_create()
        .unwrap();
    let audit = db.collection("audit").unwrap();
    assert_eq!(audit.count().unwrap(), 0);
    audit.insert_one(doc! { event: "opened" }).unwrap();
    db.close().unwrap();
    remove_path(&path);
}
