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
use crate::models::{LeadSource, LeadStatus};
use crate::services::lead_service::{self, LeadFilter, LeadUpdate, NewLead};

#[derive(Debug, Deserialize)]
pub struct LeadsQuery {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list_leads(
    State(db): State<DatabaseConnection>,
    Query(params): Query<LeadsQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams::new(params.page, params.limit);
    let filter = LeadFilter {
        status: params.status,
        source: params.source,
        search: params.search,
    };

    let leads = lead_service::list_leads(&db, filter, page).await?;
    Ok(Json(json!(leads)))
}

pub async fn get_lead(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    let lead = lead_service::get_lead(&db, id).await?;
    Ok(Json(json!({ "lead": lead })))
}

pub async fn update_lead(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<LeadUpdate>,
) -> ApiResult<Json<Value>> {
    let lead = lead_service::update_lead(&db, id, payload).await?;
    Ok(Json(json!({
        "lead": lead,
        "message": "Lead updated successfully"
    })))
}

pub async fn delete_lead(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    lead_service::delete_lead(&db, id).await?;
    Ok(Json(json!({ "message": "Lead deleted successfully" })))
}

/// Contact form on the fan sites
pub async fn submit_lead(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<NewLead>,
) -> ApiResult<impl IntoResponse> {
    let lead = lead_service::create_lead(&db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": lead.id,
            "message": "Thanks! We will get back to you soon."
        })),
    ))
}
