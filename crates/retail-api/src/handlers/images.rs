//! Product image endpoints over the blob container.

use super::file_error_response;
use crate::app_context::AppContext;
use crate::models::{ImageDeleteQuery, ImageUploadResponse};
use actix_web::{web, HttpResponse};
use bytes::Bytes;

/// POST /v1/api/images/{fileName}
///
/// Raw request body is the image content; responds with the blob's
/// public URL for the client to store on its product.
pub async fn upload(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: Bytes,
) -> HttpResponse {
    let file_name = path.into_inner();
    match ctx.images.upload_object(&file_name, body).await {
        Ok(url) => HttpResponse::Created().json(ImageUploadResponse {
            image_url: url.to_string(),
        }),
        Err(e) => file_error_response("upload image", e),
    }
}

/// DELETE /v1/api/images?url={imageUrl}
///
/// Deleting an already-removed image succeeds.
pub async fn delete(
    ctx: web::Data<AppContext>,
    query: web::Query<ImageDeleteQuery>,
) -> HttpResponse {
    match ctx.images.delete_object(&query.url).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => file_error_response("delete image", e),
    }
}
