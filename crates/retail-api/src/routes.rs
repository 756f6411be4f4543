//! API routes configuration.
//!
//! All endpoints use the /v1 version prefix:
//! - /v1/api/categories, /v1/api/products - entity CRUD
//! - /v1/api/users - registration and lookup
//! - /v1/api/contracts - file share CRUD
//! - /v1/api/images - blob upload/delete
//! - GET /v1/api/healthcheck - health check endpoint

use crate::handlers;
use actix_web::{web, HttpResponse};
use serde_json::json;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1").service(
            web::scope("/api")
                .service(
                    web::scope("/categories")
                        .route("", web::get().to(handlers::categories::list))
                        .route("", web::post().to(handlers::categories::add))
                        .route(
                            "/{partitionKey}/{rowKey}",
                            web::get().to(handlers::categories::get),
                        )
                        .route(
                            "/{partitionKey}/{rowKey}",
                            web::put().to(handlers::categories::update),
                        )
                        .route(
                            "/{partitionKey}/{rowKey}",
                            web::delete().to(handlers::categories::delete),
                        ),
                )
                .service(
                    web::scope("/products")
                        .route("", web::get().to(handlers::products::list))
                        .route("", web::post().to(handlers::products::add))
                        .route(
                            "/{partitionKey}/{rowKey}",
                            web::get().to(handlers::products::get),
                        )
                        .route(
                            "/{partitionKey}/{rowKey}",
                            web::put().to(handlers::products::update),
                        )
                        .route(
                            "/{partitionKey}/{rowKey}",
                            web::delete().to(handlers::products::delete),
                        ),
                )
                .service(
                    web::scope("/users")
                        .route("", web::post().to(handlers::users::register))
                        .route(
                            "/by-username/{username}",
                            web::get().to(handlers::users::get_by_username),
                        ),
                )
                .service(
                    web::scope("/contracts")
                        .route("", web::get().to(handlers::contracts::list))
                        .route(
                            "/download/{fileName}",
                            web::get().to(handlers::contracts::download),
                        )
                        .route("/{fileName}", web::post().to(handlers::contracts::upload))
                        .route("/{fileName}", web::delete().to(handlers::contracts::delete)),
                )
                .service(
                    web::scope("/images")
                        .route("", web::delete().to(handlers::images::delete))
                        .route("/{fileName}", web::post().to(handlers::images::upload)),
                )
                .route("/healthcheck", web::get().to(healthcheck_handler)),
        ),
    );
}

/// Health check endpoint handler
async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1"
    }))
}
