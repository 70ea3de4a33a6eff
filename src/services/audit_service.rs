//! Audit Service - append-only trail of sensitive mutations

use chrono::{Duration, SecondsFormat, Utc};
use sea_orm::*;
use std::time::Duration as StdDuration;

use super::{fetch_page, now};
use crate::domain::{DomainError, PageParams, Paginated};
use crate::models::audit_log::{self, AuditStatus, Entity as AuditLog};

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub user_id: Option<i32>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub payload: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: AuditStatus,
}

#[derive(Debug, Default, Clone)]
pub struct AuditFilter {
    pub action: Option<String>,
    pub resource: Option<String>,
    pub status: Option<AuditStatus>,
    pub user_id: Option<i32>,
}

pub async fn record(
    db: &DatabaseConnection,
    entry: AuditEntry,
) -> Result<audit_log::Model, DomainError> {
    let model = audit_log::ActiveModel {
        user_id: Set(entry.user_id),
        action: Set(entry.action),
        resource: Set(entry.resource),
        resource_id: Set(entry.resource_id),
        payload: Set(entry.payload),
        ip_address: Set(entry.ip_address),
        user_agent: Set(entry.user_agent),
        status: Set(entry.status),
        created_at: Set(now()),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Write an entry on a detached task. Errors are logged and dropped so the
/// triggering request never waits on or fails because of the audit trail.
pub fn record_detached(db: DatabaseConnection, entry: AuditEntry) {
    tokio::spawn(async move {
        let action = entry.action.clone();
        let resource = entry.resource.clone();
        if let Err(e) = record(&db, entry).await {
            tracing::error!("Failed to write audit log for {} {}: {}", action, resource, e);
        }
    });
}

pub async fn list_audit_logs(
    db: &DatabaseConnection,
    filter: AuditFilter,
    params: PageParams,
) -> Result<Paginated<audit_log::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(action) = filter.action {
        condition = condition.add(audit_log::Column::Action.eq(action.to_uppercase()));
    }
    if let Some(resource) = filter.resource {
        condition = condition.add(audit_log::Column::Resource.starts_with(&resource));
    }
    if let Some(status) = filter.status {
        condition = condition.add(audit_log::Column::Status.eq(status));
    }
    if let Some(user_id) = filter.user_id {
        condition = condition.add(audit_log::Column::UserId.eq(user_id));
    }

    let query = AuditLog::find()
        .filter(condition)
        .order_by_desc(audit_log::Column::CreatedAt)
        .order_by_desc(audit_log::Column::Id);

    fetch_page(db, query, params).await
}

/// Delete entries older than `days`; returns the number removed
pub async fn purge_older_than(db: &DatabaseConnection, days: i64) -> Result<u64, DomainError> {
    if days < 0 {
        return Err(DomainError::Validation(
            "older_than_days must not be negative".to_string(),
        ));
    }

    let cutoff = Duration::try_days(days)
        .and_then(|age| Utc::now().checked_sub_signed(age))
        .ok_or_else(|| DomainError::Validation(format!("older_than_days {} is out of range", days)))?
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let result = AuditLog::delete_many()
        .filter(audit_log::Column::CreatedAt.lt(cutoff))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Background retention loop spawned at startup
pub async fn run_retention(db: DatabaseConnection, retention_days: i64, every: StdDuration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        match purge_older_than(&db, retention_days).await {
            Ok(0) => tracing::debug!("Audit retention: nothing to purge"),
            Ok(n) => tracing::info!(
                "Audit retention: purged {} entries older than {} days",
                n,
                retention_days
            ),
            Err(e) => tracing::error!("Audit retention failed: {}", e),
        }
    }
}
