//! Generic table-entity CRUD shared by the category and product
//! resources. The per-resource modules pick the store out of the
//! context and delegate here.

use super::table_error_response;
use actix_web::HttpResponse;
use retail_commons::entity::TableEntity;
use retail_store::{TableStore, TableStoreError};

pub(crate) async fn list<E: TableEntity>(store: &TableStore<E>, resource: &str) -> HttpResponse {
    match store.list_all_async().await {
        Ok(entities) => HttpResponse::Ok().json(entities),
        Err(e) => table_error_response(&format!("list {resource}"), e),
    }
}

pub(crate) async fn get<E: TableEntity>(
    store: &TableStore<E>,
    resource: &str,
    partition_key: &str,
    row_key: &str,
) -> HttpResponse {
    match store.get_async(partition_key, row_key).await {
        Ok(Some(entity)) => HttpResponse::Ok().json(entity),
        Ok(None) => table_error_response(
            &format!("get {resource}"),
            TableStoreError::NotFound {
                partition_key: partition_key.to_string(),
                row_key: row_key.to_string(),
            },
        ),
        Err(e) => table_error_response(&format!("get {resource}"), e),
    }
}

/// Creates the entity, forcing the resource's partition key. A client
/// may omit the row key; the store then generates one.
pub(crate) async fn add<E: TableEntity>(
    store: &TableStore<E>,
    resource: &str,
    partition_key: &str,
    mut entity: E,
) -> HttpResponse {
    entity.meta_mut().partition_key = partition_key.to_string();
    match store.add_async(entity).await {
        Ok(stored) => HttpResponse::Created().json(stored),
        Err(e) => table_error_response(&format!("add {resource}"), e),
    }
}

/// Conditionally replaces the entity at the path's address. The keys
/// come from the path; the version token must come with the body.
pub(crate) async fn update<E: TableEntity>(
    store: &TableStore<E>,
    resource: &str,
    partition_key: &str,
    row_key: &str,
    mut entity: E,
) -> HttpResponse {
    entity.meta_mut().partition_key = partition_key.to_string();
    entity.meta_mut().row_key = row_key.to_string();
    match store.update_async(entity).await {
        Ok(stored) => HttpResponse::Ok().json(stored),
        Err(e) => table_error_response(&format!("update {resource}"), e),
    }
}

pub(crate) async fn delete<E: TableEntity>(
    store: &TableStore<E>,
    resource: &str,
    partition_key: &str,
    row_key: &str,
) -> HttpResponse {
    match store.delete_async(partition_key, row_key).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => table_error_response(
            &format!("delete {resource}"),
            TableStoreError::NotFound {
                partition_key: partition_key.to_string(),
                row_key: row_key.to_string(),
            },
        ),
        Err(e) => table_error_response(&format!("delete {resource}"), e),
    }
}
