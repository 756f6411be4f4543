//! Request handlers, one module per resource.
//!
//! Handlers return `HttpResponse` directly and map store errors to
//! statuses here in one place: 404 for missing rows/directories, 409
//! for both add collisions and version conflicts, 400 for malformed
//! input, 500 otherwise. The raw error text is logged, never echoed.

pub mod categories;
pub mod contracts;
pub mod entities;
pub mod images;
pub mod products;
pub mod users;

use crate::models::ErrorResponse;
use actix_web::HttpResponse;
use retail_filestore::FileStoreError;
use retail_store::TableStoreError;

pub(crate) fn table_error_response(context: &str, err: TableStoreError) -> HttpResponse {
    match err {
        TableStoreError::NotFound { .. } => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", "Entity not found"))
        }
        TableStoreError::Conflict { .. } => {
            log::warn!("{}: {}", context, err);
            HttpResponse::Conflict()
                .json(ErrorResponse::new("conflict", "An entity with this key already exists"))
        }
        TableStoreError::ConcurrencyConflict { .. } => {
            log::warn!("{}: {}", context, err);
            HttpResponse::Conflict().json(ErrorResponse::new(
                "concurrency_conflict",
                "The entity was modified by another request; re-read and retry",
            ))
        }
        TableStoreError::InvalidKey(_) => {
            log::warn!("{}: {}", context, err);
            HttpResponse::BadRequest().json(ErrorResponse::new("invalid_key", "Invalid entity key"))
        }
        other => {
            log::error!("{}: {}", context, other);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Storage operation failed"))
        }
    }
}

pub(crate) fn file_error_response(context: &str, err: FileStoreError) -> HttpResponse {
    match err {
        FileStoreError::DirectoryNotFound(_) => {
            log::warn!("{}: {}", context, err);
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", "Directory not found"))
        }
        FileStoreError::InvalidName(_) | FileStoreError::InvalidUrl(_) => {
            log::warn!("{}: {}", context, err);
            HttpResponse::BadRequest()
                .json(ErrorResponse::new("invalid_input", "Invalid file name or URL"))
        }
        other => {
            log::error!("{}: {}", context, other);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("internal_error", "Storage operation failed"))
        }
    }
}
