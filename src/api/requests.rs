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
use crate::domain::{PageParams, Workflow};
use crate::models::request;
use crate::models::{RequestPriority, RequestStatus, RequestType};
use crate::services::request_service::{self, NewRequest, RequestFilter};

#[derive(Debug, Deserialize)]
pub struct RequestsQuery {
    pub status: Option<RequestStatus>,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    pub priority: Option<RequestPriority>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: RequestStatus,
}

fn with_actions(request: &request::Model) -> Value {
    json!({
        "request": request,
        "available_actions": request.status.available_actions(),
    })
}

pub async fn list_requests(
    State(db): State<DatabaseConnection>,
    Query(params): Query<RequestsQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams::new(params.page, params.limit);
    let filter = RequestFilter {
        status: params.status,
        request_type: params.request_type,
        priority: params.priority,
    };

    let requests = request_service::list_requests(&db, filter, page).await?;
    Ok(Json(json!(requests)))
}

pub async fn get_request(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let request = request_service::get_request(&db, id).await?;
    Ok(Json(with_actions(&request)))
}

pub async fn update_request_status(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<StatusChange>,
) -> ApiResult<Json<Value>> {
    let request = request_service::transition_request(&db, id, payload.status).await?;
    Ok(Json(with_actions(&request)))
}

pub async fn delete_request(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    request_service::delete_request(&db, id).await?;
    Ok(Json(json!({ "message": "Request deleted successfully" })))
}

pub async fn submit_request(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<NewRequest>,
) -> ApiResult<impl IntoResponse> {
    let request = request_service::create_request(&db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": request.id,
            "status": request.status,
            "message": "Request submitted"
        })),
    ))
}

pub async fn vote_request(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let request = request_service::vote(&db, id).await?;
    Ok(Json(json!({ "id": request.id, "votes": request.votes })))
}
