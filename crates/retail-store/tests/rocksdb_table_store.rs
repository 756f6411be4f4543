//! TableStore over the real RocksDB backend.

use retail_commons::models::Product;
use retail_commons::PARTITION_PRODUCTS;
use retail_store::test_utils::TestDb;
use retail_store::{CollisionPolicy, RocksDbBackend, TableStore, TableStoreError};
use std::sync::Arc;

fn product_store(test_db: &TestDb) -> TableStore<Product> {
    let backend = Arc::new(RocksDbBackend::new(test_db.db.clone()));
    TableStore::new(backend, "products", CollisionPolicy::Overwrite).unwrap()
}

#[test]
fn test_product_roundtrip_on_rocksdb() {
    let test_db = TestDb::with_retail_tables().unwrap();
    let store = product_store(&test_db);

    let mut product = Product::new(PARTITION_PRODUCTS, "Sneaker", 59.99);
    product.quantity = 3;
    let stored = store.add(product).unwrap();

    let found = store
        .get(PARTITION_PRODUCTS, &stored.meta.row_key)
        .unwrap()
        .expect("product should exist");
    assert_eq!(found.name, "Sneaker");
    assert_eq!(found.quantity, 3);
    assert!(found.meta.etag.is_some());
}

#[test]
fn test_concurrency_guard_on_rocksdb() {
    let test_db = TestDb::with_retail_tables().unwrap();
    let store = product_store(&test_db);

    let v1 = store
        .add(Product::new(PARTITION_PRODUCTS, "Sneaker", 59.99))
        .unwrap();

    let mut restock = v1.clone();
    restock.quantity = 10;
    let v2 = store.update(restock).unwrap();

    let mut stale = v1.clone();
    stale.quantity = 99;
    assert!(matches!(
        store.update(stale).unwrap_err(),
        TableStoreError::ConcurrencyConflict { .. }
    ));

    let mut fresh = v2.clone();
    fresh.quantity = 7;
    store.update(fresh).unwrap();

    let found = store
        .get(PARTITION_PRODUCTS, &v1.meta.row_key)
        .unwrap()
        .unwrap();
    assert_eq!(found.quantity, 7);
}

#[test]
fn test_overwrite_policy_on_rocksdb() {
    let test_db = TestDb::with_retail_tables().unwrap();
    let store = product_store(&test_db);

    let stored = store
        .add(Product::new(PARTITION_PRODUCTS, "Sneaker", 59.99))
        .unwrap();

    // Same (partition, row) pair: overwrite store replaces in place,
    // matching the legacy add-then-update fallback for products.
    let mut replacement = Product::new(PARTITION_PRODUCTS, "Sneaker v2", 64.99);
    replacement.meta.row_key = stored.meta.row_key.clone();
    store.add(replacement).unwrap();

    let found = store
        .get(PARTITION_PRODUCTS, &stored.meta.row_key)
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Sneaker v2");
}

#[test]
fn test_list_all_on_rocksdb() {
    let test_db = TestDb::with_retail_tables().unwrap();
    let store = product_store(&test_db);

    for name in ["a", "b", "c"] {
        store
            .add(Product::new(PARTITION_PRODUCTS, name, 1.0))
            .unwrap();
    }

    let all: Vec<Product> = store
        .list_all()
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(all.len(), 3);
}
