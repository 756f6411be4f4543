//! End-to-end handler tests against in-memory storage backends.

use actix_web::{test, web, App};
use bytes::Bytes;
use object_store::memory::InMemory;
use retail_api::{configure_routes, AppContext};
use retail_commons::constants::{
    CONTRACTS_DIRECTORY, PARTITION_CATEGORIES, PARTITION_PRODUCTS, TABLE_CATEGORIES,
    TABLE_PRODUCTS, TABLE_USERS,
};
use retail_commons::models::{Category, Product, UserAccount};
use retail_filestore::{BlobObjectStore, FileShareStore};
use retail_store::test_utils::InMemoryBackend;
use retail_store::{CollisionPolicy, StorageBackend, TableStore};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

async fn app_context() -> AppContext {
    let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());

    let contracts = FileShareStore::new(Arc::new(InMemory::new()), Duration::from_secs(5));
    contracts.create_directory(CONTRACTS_DIRECTORY).await.unwrap();

    let images = BlobObjectStore::new(
        Arc::new(InMemory::new()),
        Url::parse("https://cdn.example.com/images").unwrap(),
        Duration::from_secs(5),
    );

    AppContext {
        categories: TableStore::new(backend.clone(), TABLE_CATEGORIES, CollisionPolicy::Reject)
            .unwrap(),
        products: TableStore::new(backend.clone(), TABLE_PRODUCTS, CollisionPolicy::Overwrite)
            .unwrap(),
        users: TableStore::new(backend, TABLE_USERS, CollisionPolicy::Reject).unwrap(),
        contracts,
        contracts_directory: CONTRACTS_DIRECTORY.to_string(),
        images,
        registration_lock: tokio::sync::Mutex::new(()),
    }
}

macro_rules! test_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_healthcheck() {
    let app = test_app!(app_context().await);

    let req = test::TestRequest::get().uri("/v1/api/healthcheck").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["status"], "healthy");
}

#[actix_web::test]
async fn test_category_crud_cycle() {
    let app = test_app!(app_context().await);

    // Create
    let req = test::TestRequest::post()
        .uri("/v1/api/categories")
        .set_json(json!({"partitionKey": "ignored", "name": "Shoes"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: Category = test::read_body_json(resp).await;
    assert_eq!(created.meta.partition_key, PARTITION_CATEGORIES);
    assert!(!created.meta.row_key.is_empty());
    assert!(created.meta.etag.is_some());

    let path = format!(
        "/v1/api/categories/{}/{}",
        created.meta.partition_key, created.meta.row_key
    );

    // Read
    let req = test::TestRequest::get().uri(&path).to_request();
    let fetched: Category = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.name, "Shoes");

    // Conditional update with the stored version token
    let mut updated = fetched.clone();
    updated.name = "Footwear".to_string();
    let req = test::TestRequest::put().uri(&path).set_json(&updated).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let after: Category = test::read_body_json(resp).await;
    assert_eq!(after.name, "Footwear");
    assert_ne!(after.meta.etag, fetched.meta.etag);

    // List
    let req = test::TestRequest::get().uri("/v1/api/categories").to_request();
    let all: Vec<Category> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 1);

    // Delete, then the row is gone
    let req = test::TestRequest::delete().uri(&path).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get().uri(&path).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_stale_version_token_conflicts() {
    let app = test_app!(app_context().await);

    let req = test::TestRequest::post()
        .uri("/v1/api/categories")
        .set_json(json!({"partitionKey": "x", "name": "Books"}))
        .to_request();
    let created: Category = test::call_and_read_body_json(&app, req).await;
    let path = format!(
        "/v1/api/categories/{}/{}",
        created.meta.partition_key, created.meta.row_key
    );

    // First writer wins
    let mut first = created.clone();
    first.name = "Books & Media".to_string();
    let req = test::TestRequest::put().uri(&path).set_json(&first).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // Second writer still holds the original token
    let mut second = created.clone();
    second.name = "Paper goods".to_string();
    let req = test::TestRequest::put().uri(&path).set_json(&second).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "concurrency_conflict");
}

#[actix_web::test]
async fn test_update_without_token_conflicts() {
    let app = test_app!(app_context().await);

    let req = test::TestRequest::post()
        .uri("/v1/api/categories")
        .set_json(json!({"partitionKey": "x", "name": "Toys"}))
        .to_request();
    let created: Category = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!(
            "/v1/api/categories/{}/{}",
            created.meta.partition_key, created.meta.row_key
        ))
        .set_json(json!({"partitionKey": "x", "name": "Games"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn test_product_reupload_overwrites() {
    let app = test_app!(app_context().await);

    let product = json!({
        "partitionKey": PARTITION_PRODUCTS,
        "rowKey": "sku-1",
        "name": "Sneaker",
        "price": 59.90,
        "description": "Canvas",
        "imageUrl": "",
        "quantity": 10,
        "categoryRowKey": "cat-1"
    });

    let req = test::TestRequest::post()
        .uri("/v1/api/products")
        .set_json(&product)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    // Same row key again: the products store overwrites instead of rejecting
    let req = test::TestRequest::post()
        .uri("/v1/api/products")
        .set_json(&product)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::get().uri("/v1/api/products").to_request();
    let all: Vec<Product> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 1);
}

#[actix_web::test]
async fn test_user_registration_and_lookup() {
    let app = test_app!(app_context().await);

    let account = json!({
        "partitionKey": "ignored",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "phoneNumber": "555-0100",
        "email": "ada@example.com",
        "username": "ada",
        "passwordHash": "argon2id$..."
    });

    let req = test::TestRequest::post().uri("/v1/api/users").set_json(&account).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: UserAccount = test::read_body_json(resp).await;
    assert_eq!(created.role, "User");

    // Duplicate username is rejected
    let req = test::TestRequest::post().uri("/v1/api/users").set_json(&account).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 409);

    let req = test::TestRequest::get().uri("/v1/api/users/by-username/ada").to_request();
    let found: UserAccount = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.email, "ada@example.com");

    let req = test::TestRequest::get().uri("/v1/api/users/by-username/ghost").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_concurrent_registration_admits_one() {
    let app = test_app!(app_context().await);

    let account = json!({
        "partitionKey": "ignored",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "phoneNumber": "555-0100",
        "email": "ada@example.com",
        "username": "ada",
        "passwordHash": "argon2id$..."
    });

    // Race several registrations for the same username
    let requests = (0..8).map(|_| {
        let req = test::TestRequest::post().uri("/v1/api/users").set_json(&account).to_request();
        test::call_service(&app, req)
    });
    let responses = futures_util::future::join_all(requests).await;

    let created = responses.iter().filter(|r| r.status() == 201).count();
    let rejected = responses.iter().filter(|r| r.status() == 409).count();
    assert_eq!(created, 1);
    assert_eq!(rejected, 7);

    // Exactly one account ended up stored
    let req = test::TestRequest::get().uri("/v1/api/users/by-username/ada").to_request();
    let found: UserAccount = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.username, "ada");
}

#[actix_web::test]
async fn test_contract_upload_download_delete() {
    let app = test_app!(app_context().await);

    let req = test::TestRequest::post()
        .uri("/v1/api/contracts/alice.pdf")
        .set_payload(Bytes::from_static(b"%PDF-1.7"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get().uri("/v1/api/contracts").to_request();
    let names: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names, vec!["alice.pdf".to_string()]);

    let req = test::TestRequest::get()
        .uri("/v1/api/contracts/download/alice.pdf")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    let body = test::read_body(resp).await;
    assert_eq!(body, Bytes::from_static(b"%PDF-1.7"));

    let req = test::TestRequest::delete().uri("/v1/api/contracts/alice.pdf").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    // Second delete reports the file is gone
    let req = test::TestRequest::delete().uri("/v1/api/contracts/alice.pdf").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_image_upload_returns_url_and_delete_is_idempotent() {
    let app = test_app!(app_context().await);

    let req = test::TestRequest::post()
        .uri("/v1/api/images/shoe.png")
        .set_payload(Bytes::from_static(b"png-bytes"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    let image_url = body["imageUrl"].as_str().unwrap().to_string();
    assert_eq!(image_url, "https://cdn.example.com/images/shoe.png");

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/api/images?url={}", image_url))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    // Already gone, still a success
    let req = test::TestRequest::delete()
        .uri(&format!("/v1/api/images?url={}", image_url))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);
}
