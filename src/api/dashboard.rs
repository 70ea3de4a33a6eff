use axum::{Json, extract::State};
use sea_orm::DatabaseConnection;

use super::error::ApiResult;
use crate::auth::Claims;
use crate::services::dashboard_service::{self, DashboardStats};

pub async fn get_stats(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(dashboard_service::stats(&db, claims.sub).await?))
}
