use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::ApiResult;
use crate::domain::PageParams;
use crate::models::ContentType;
use crate::services::content_service::{self, ContentFilter, ContentInput, NewEvent};

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub content_type: Option<ContentType>,
    pub character: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list_content(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ContentQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams::new(params.page, params.limit);
    let filter = ContentFilter {
        content_type: params.content_type,
        character: params.character,
    };

    let items = content_service::list_content(&db, filter, page).await?;
    Ok(Json(json!(items)))
}

pub async fn get_content(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let item = content_service::get_content(&db, id).await?;
    Ok(Json(json!({ "content": item })))
}

pub async fn create_content(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<ContentInput>,
) -> ApiResult<impl IntoResponse> {
    let item = content_service::create_content(&db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "content": item,
            "message": "Content created successfully"
        })),
    ))
}

pub async fn update_content(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<ContentInput>,
) -> ApiResult<Json<Value>> {
    let item = content_service::update_content(&db, id, payload).await?;
    Ok(Json(json!({
        "content": item,
        "message": "Content updated successfully"
    })))
}

pub async fn delete_content(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    content_service::delete_content(&db, id).await?;
    Ok(Json(json!({ "message": "Content deleted successfully" })))
}

/// View/like/share beacon from the fan sites
pub async fn record_event(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<NewEvent>,
) -> ApiResult<impl IntoResponse> {
    let event = content_service::record_event(&db, id, payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": event.id }))))
}
