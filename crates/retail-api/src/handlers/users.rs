//! User account endpoints: registration and lookup by username.

use super::table_error_response;
use crate::app_context::AppContext;
use crate::models::ErrorResponse;
use actix_web::{web, HttpResponse};
use retail_commons::constants::PARTITION_USERS;
use retail_commons::entity::TableEntity;
use retail_commons::models::UserAccount;

/// POST /v1/api/users
///
/// Registers a new account. Usernames are unique; the row key is always
/// generated server-side. The uniqueness check and the insert run under
/// the context's registration lock, so concurrent requests for the same
/// username cannot both pass the check.
pub async fn register(ctx: web::Data<AppContext>, body: web::Json<UserAccount>) -> HttpResponse {
    let mut account = body.into_inner();

    if account.username.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("invalid_input", "Username must not be empty"));
    }

    let _guard = ctx.registration_lock.lock().await;

    let username = account.username.clone();
    match ctx
        .users
        .find_async(move |u: &UserAccount| u.username == username)
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict()
                .json(ErrorResponse::new("conflict", "Username is already taken"));
        }
        Ok(None) => {}
        Err(e) => return table_error_response("register user", e),
    }

    account.meta_mut().partition_key = PARTITION_USERS.to_string();
    account.meta_mut().row_key = String::new();

    match ctx.users.add_async(account).await {
        Ok(stored) => HttpResponse::Created().json(stored),
        Err(e) => table_error_response("register user", e),
    }
}

/// GET /v1/api/users/by-username/{username}
pub async fn get_by_username(ctx: web::Data<AppContext>, path: web::Path<String>) -> HttpResponse {
    let username = path.into_inner();
    match ctx
        .users
        .find_async(move |u: &UserAccount| u.username == username)
        .await
    {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", "User not found"))
        }
        Err(e) => table_error_response("get user", e),
    }
}
