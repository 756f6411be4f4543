//! Category CRUD endpoints.

use super::entities;
use crate::app_context::AppContext;
use actix_web::{web, HttpResponse};
use retail_commons::constants::PARTITION_CATEGORIES;
use retail_commons::models::Category;

pub async fn list(ctx: web::Data<AppContext>) -> HttpResponse {
    entities::list(&ctx.categories, "category").await
}

pub async fn get(ctx: web::Data<AppContext>, path: web::Path<(String, String)>) -> HttpResponse {
    let (partition_key, row_key) = path.into_inner();
    entities::get(&ctx.categories, "category", &partition_key, &row_key).await
}

pub async fn add(ctx: web::Data<AppContext>, body: web::Json<Category>) -> HttpResponse {
    entities::add(&ctx.categories, "category", PARTITION_CATEGORIES, body.into_inner()).await
}

pub async fn update(
    ctx: web::Data<AppContext>,
    path: web::Path<(String, String)>,
    body: web::Json<Category>,
) -> HttpResponse {
    let (partition_key, row_key) = path.into_inner();
    entities::update(&ctx.categories, "category", &partition_key, &row_key, body.into_inner())
        .await
}

pub async fn delete(ctx: web::Data<AppContext>, path: web::Path<(String, String)>) -> HttpResponse {
    let (partition_key, row_key) = path.into_inner();
    entities::delete(&ctx.categories, "category", &partition_key, &row_key).await
}
