use crate::auth::{Claims, clear_session_cookie, create_jwt, session_cookie};
use crate::models::user::UserDto;
use crate::services::user_service;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use super::error::ApiResult;
use crate::domain::DomainError;

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    tracing::info!("Login attempt for user: {}", payload.username);

    let Some(user) = user_service::authenticate(&db, &payload.username, &payload.password).await?
    else {
        tracing::warn!("Login failed for user: {}", payload.username);
        return Err(DomainError::Unauthorized("Invalid credentials".to_string()));
    };

    let token = create_jwt(user.id, &user.username, &user.role).map_err(DomainError::Internal)?;
    tracing::info!("User {} signed in", user.username);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(json!({ "token": token, "user": UserDto::from(user) })),
    ))
}

pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Signed out" })),
    )
}

pub async fn get_me(claims: Claims) -> impl IntoResponse {
    Json(json!({
        "id": claims.sub,
        "username": claims.username,
        "role": claims.role,
    }))
}
