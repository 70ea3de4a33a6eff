use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::ApiResult;
use crate::auth::Claims;
use crate::domain::PageParams;
use crate::services::notification_service;

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list_notifications(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Query(params): Query<NotificationsQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams::new(params.page, params.limit);
    let result = notification_service::list(&db, claims.sub, params.unread_only, page).await?;

    Ok(Json(json!({
        "notifications": result.page.items,
        "total": result.page.total,
        "page": result.page.page,
        "limit": result.page.limit,
        "total_pages": result.page.total_pages,
        "unread_count": result.unread_count,
    })))
}

pub async fn mark_read(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let unread_count = notification_service::mark_read(&db, claims.sub, id).await?;
    Ok(Json(json!({ "id": id, "is_read": true, "unread_count": unread_count })))
}

pub async fn mark_all_read(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> ApiResult<Json<Value>> {
    let updated = notification_service::mark_all_read(&db, claims.sub).await?;
    let unread_count = notification_service::unread_count(&db, claims.sub).await?;
    Ok(Json(json!({ "updated": updated, "unread_count": unread_count })))
}

pub async fn delete_notification(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    notification_service::delete(&db, claims.sub, id).await?;
    let unread_count = notification_service::unread_count(&db, claims.sub).await?;
    Ok(Json(json!({
        "message": "Notification deleted",
        "unread_count": unread_count
    })))
}
