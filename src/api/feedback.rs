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
use crate::models::feedback;
use crate::models::{FeedbackStatus, FeedbackType};
use crate::services::feedback_service::{self, FeedbackFilter, NewFeedback};

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    pub status: Option<FeedbackStatus>,
    #[serde(rename = "type")]
    pub feedback_type: Option<FeedbackType>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: FeedbackStatus,
    pub response: Option<String>,
}

fn with_actions(feedback: &feedback::Model) -> Value {
    json!({
        "feedback": feedback,
        "available_actions": feedback.status.available_actions(),
    })
}

pub async fn list_feedback(
    State(db): State<DatabaseConnection>,
    Query(params): Query<FeedbackQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams::new(params.page, params.limit);
    let filter = FeedbackFilter {
        status: params.status,
        feedback_type: params.feedback_type,
    };

    let items = feedback_service::list_feedback(&db, filter, page).await?;
    Ok(Json(json!(items)))
}

pub async fn get_feedback(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let item = feedback_service::get_feedback(&db, id).await?;
    Ok(Json(with_actions(&item)))
}

pub async fn update_feedback_status(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<StatusChange>,
) -> ApiResult<Json<Value>> {
    let item =
        feedback_service::transition_feedback(&db, id, payload.status, payload.response).await?;
    Ok(Json(with_actions(&item)))
}

pub async fn delete_feedback(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    feedback_service::delete_feedback(&db, id).await?;
    Ok(Json(json!({ "message": "Feedback deleted successfully" })))
}

pub async fn submit_feedback(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<NewFeedback>,
) -> ApiResult<impl IntoResponse> {
    let item = feedback_service::create_feedback(&db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": item.id,
            "message": "Thank you for your feedback!"
        })),
    ))
}
