//! Employee contract endpoints over the file share.

use super::file_error_response;
use crate::app_context::AppContext;
use crate::models::{ErrorResponse, FileUploadResponse};
use actix_web::{web, HttpResponse};
use bytes::Bytes;

/// GET /v1/api/contracts
pub async fn list(ctx: web::Data<AppContext>) -> HttpResponse {
    match ctx.contracts.list_files(&ctx.contracts_directory).await {
        Ok(names) => HttpResponse::Ok().json(names),
        Err(e) => file_error_response("list contracts", e),
    }
}

/// POST /v1/api/contracts/{fileName}
///
/// Raw request body is the file content. Re-uploading a name replaces
/// the stored file.
pub async fn upload(
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: Bytes,
) -> HttpResponse {
    let file_name = path.into_inner();
    match ctx
        .contracts
        .upload_file(&ctx.contracts_directory, &file_name, body)
        .await
    {
        Ok(()) => HttpResponse::Created().json(FileUploadResponse { file_name }),
        Err(e) => file_error_response("upload contract", e),
    }
}

/// GET /v1/api/contracts/download/{fileName}
///
/// Content type is guessed from the file extension.
pub async fn download(ctx: web::Data<AppContext>, path: web::Path<String>) -> HttpResponse {
    let file_name = path.into_inner();
    match ctx
        .contracts
        .download_file(&ctx.contracts_directory, &file_name)
        .await
    {
        Ok(Some(data)) => {
            let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
            HttpResponse::Ok().content_type(mime.as_ref()).body(data)
        }
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new("not_found", "File not found")),
        Err(e) => file_error_response("download contract", e),
    }
}

/// DELETE /v1/api/contracts/{fileName}
pub async fn delete(ctx: web::Data<AppContext>, path: web::Path<String>) -> HttpResponse {
    let file_name = path.into_inner();
    match ctx
        .contracts
        .delete_file(&ctx.contracts_directory, &file_name)
        .await
    {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", "File not found"))
        }
        Err(e) => file_error_response("delete contract", e),
    }
}
