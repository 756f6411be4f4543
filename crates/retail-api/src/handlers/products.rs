//! Product CRUD endpoints.

use super::entities;
use crate::app_context::AppContext;
use actix_web::{web, HttpResponse};
use retail_commons::constants::PARTITION_PRODUCTS;
use retail_commons::models::Product;

pub async fn list(ctx: web::Data<AppContext>) -> HttpResponse {
    entities::list(&ctx.products, "product").await
}

pub async fn get(ctx: web::Data<AppContext>, path: web::Path<(String, String)>) -> HttpResponse {
    let (partition_key, row_key) = path.into_inner();
    entities::get(&ctx.products, "product", &partition_key, &row_key).await
}

pub async fn add(ctx: web::Data<AppContext>, body: web::Json<Product>) -> HttpResponse {
    entities::add(&ctx.products, "product", PARTITION_PRODUCTS, body.into_inner()).await
}

pub async fn update(
    ctx: web::Data<AppContext>,
    path: web::Path<(String, String)>,
    body: web::Json<Product>,
) -> HttpResponse {
    let (partition_key, row_key) = path.into_inner();
    entities::update(&ctx.products, "product", &partition_key, &row_key, body.into_inner()).await
}

pub async fn delete(ctx: web::Data<AppContext>, path: web::Path<(String, String)>) -> HttpResponse {
    let (partition_key, row_key) = path.into_inner();
    entities::delete(&ctx.products, "product", &partition_key, &row_key).await
}
