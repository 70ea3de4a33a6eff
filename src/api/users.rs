use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use super::error::{ApiResult, forbidden};
use crate::auth::Claims;
use crate::models::user::UserDto;
use crate::services::user_service::{self, NewUser};

pub async fn list_users(State(db): State<DatabaseConnection>) -> ApiResult<Json<Value>> {
    let users: Vec<UserDto> = user_service::list_users(&db)
        .await?
        .into_iter()
        .map(UserDto::from)
        .collect();
    Ok(Json(json!({ "users": users, "total": users.len() })))
}

pub async fn create_user(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<NewUser>,
) -> ApiResult<Response> {
    if !claims.is_admin() {
        return Ok(forbidden());
    }

    let user = user_service::create_user(&db, payload).await?;
    tracing::info!("{} created user {}", claims.username, user.username);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": UserDto::from(user) })),
    )
        .into_response())
}

pub async fn delete_user(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    if !claims.is_admin() {
        return Ok(forbidden());
    }

    user_service::delete_user(&db, claims.sub, id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })).into_response())
}
