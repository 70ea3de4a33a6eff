use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::error::ApiResult;
use crate::domain::{DomainError, pagination::MAX_PAGE_SIZE};
use crate::models::ContentType;
use crate::services::analytics_service::{
    self, AnalyticsFilter, ContentAnalytics, DEFAULT_TOP_N,
};

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub content_type: Option<ContentType>,
    pub character: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub from: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub to: Option<String>,
    pub limit: Option<u64>,
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DomainError::Validation(format!("{} must be YYYY-MM-DD", field))),
    }
}

impl AnalyticsQuery {
    fn into_filter(self, limit: Option<u64>) -> Result<AnalyticsFilter, DomainError> {
        let from = parse_date("from", self.from.as_deref())?;
        let to = parse_date("to", self.to.as_deref())?;
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(DomainError::Validation(
                "from must not be after to".to_string(),
            ));
        }

        Ok(AnalyticsFilter {
            content_type: self.content_type,
            character: self.character,
            from,
            to,
            limit,
        })
    }
}

pub async fn content_analytics(
    State(db): State<DatabaseConnection>,
    Query(params): Query<AnalyticsQuery>,
) -> ApiResult<Json<ContentAnalytics>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_TOP_N)
        .clamp(1, MAX_PAGE_SIZE);
    let filter = params.into_filter(Some(limit))?;

    let report = analytics_service::content_analytics(&db, filter).await?;
    Ok(Json(report))
}

pub async fn export_content_csv(
    State(db): State<DatabaseConnection>,
    Query(params): Query<AnalyticsQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = params.into_filter(None)?;
    let report = analytics_service::content_analytics(&db, filter).await?;
    let body = analytics_service::render_csv(&report.top_content)?;

    let filename = format!(
        "content_analytics_{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
