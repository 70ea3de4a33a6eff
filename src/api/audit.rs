use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::{ApiResult, forbidden};
use crate::auth::Claims;
use crate::domain::PageParams;
use crate::models::AuditStatus;
use crate::services::audit_service::{self, AuditFilter};

#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    pub action: Option<String>,
    pub resource: Option<String>,
    pub status: Option<AuditStatus>,
    pub user_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PurgeQuery {
    pub older_than_days: i64,
}

pub async fn list_audit_logs(
    State(db): State<DatabaseConnection>,
    Query(params): Query<AuditLogQuery>,
) -> ApiResult<Json<Value>> {
    let page = PageParams::new(params.page, params.limit);
    let filter = AuditFilter {
        action: params.action,
        resource: params.resource,
        status: params.status,
        user_id: params.user_id,
    };

    let logs = audit_service::list_audit_logs(&db, filter, page).await?;
    Ok(Json(json!(logs)))
}

pub async fn purge_audit_logs(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Query(params): Query<PurgeQuery>,
) -> ApiResult<Response> {
    if !claims.is_admin() {
        return Ok(forbidden());
    }

    let deleted = audit_service::purge_older_than(&db, params.older_than_days).await?;
    tracing::info!(
        "{} purged {} audit entries older than {} days",
        claims.username,
        deleted,
        params.older_than_days
    );
    Ok(Json(json!({ "deleted": deleted })).into_response())
}
