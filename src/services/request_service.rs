//! Request Service - fan requests and their review pipeline

use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Deserialize;

use super::notification_service;
use super::{fetch_page, now, optional, required};
use crate::domain::{DomainError, PageParams, Paginated, Workflow};
use crate::models::NotificationType;
use crate::models::request::{
    self, Entity as Request, RequestPriority, RequestStatus, RequestType,
};

#[derive(Debug, Default, Clone)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
    pub priority: Option<RequestPriority>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub request_type: RequestType,
    pub priority: Option<RequestPriority>,
    pub submitter_name: Option<String>,
    pub submitter_email: Option<String>,
    pub site: Option<String>,
}

pub async fn list_requests(
    db: &DatabaseConnection,
    filter: RequestFilter,
    params: PageParams,
) -> Result<Paginated<request::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(status) = filter.status {
        condition = condition.add(request::Column::Status.eq(status));
    }
    if let Some(request_type) = filter.request_type {
        condition = condition.add(request::Column::RequestType.eq(request_type));
    }
    if let Some(priority) = filter.priority {
        condition = condition.add(request::Column::Priority.eq(priority));
    }

    let query = Request::find()
        .filter(condition)
        .order_by_desc(request::Column::CreatedAt)
        .order_by_desc(request::Column::Id);

    fetch_page(db, query, params).await
}

pub async fn get_request(db: &DatabaseConnection, id: i32) -> Result<request::Model, DomainError> {
    Request::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn create_request(
    db: &DatabaseConnection,
    input: NewRequest,
) -> Result<request::Model, DomainError> {
    let title = required("title", &input.title)?;
    let description = required("description", &input.description)?;
    let timestamp = now();

    let model = request::ActiveModel {
        title: Set(title),
        description: Set(description),
        request_type: Set(input.request_type),
        priority: Set(input.priority.unwrap_or(RequestPriority::Medium)),
        status: Set(RequestStatus::Pending),
        votes: Set(0),
        submitter_name: Set(optional(input.submitter_name)),
        submitter_email: Set(optional(input.submitter_email)),
        site: Set(optional(input.site)),
        created_at: Set(timestamp.clone()),
        updated_at: Set(timestamp),
        ..Default::default()
    }
    .insert(db)
    .await?;

    notification_service::broadcast(
        db,
        NotificationType::Request,
        "New request".to_string(),
        format!("\"{}\" is waiting for review", model.title),
        Some(format!("/requests/{}", model.id)),
    )
    .await;

    Ok(model)
}

/// Apply one button-click transition. Out-of-order changes are rejected and
/// the row is left untouched.
pub async fn transition_request(
    db: &DatabaseConnection,
    id: i32,
    next: RequestStatus,
) -> Result<request::Model, DomainError> {
    let existing = get_request(db, id).await?;
    transition_request_from(db, id, existing.status, next).await
}

/// Move a request from `expected` to `next`. The write only lands while the
/// stored status still equals `expected`, so two concurrent clicks cannot
/// both advance the same row.
pub async fn transition_request_from(
    db: &DatabaseConnection,
    id: i32,
    expected: RequestStatus,
    next: RequestStatus,
) -> Result<request::Model, DomainError> {
    let status = expected.transition(next)?;

    let result = Request::update_many()
        .col_expr(request::Column::Status, Expr::value(status))
        .col_expr(request::Column::UpdatedAt, Expr::value(now()))
        .filter(request::Column::Id.eq(id))
        .filter(request::Column::Status.eq(expected))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        // Gone, or moved on by someone else since it was read
        let current = get_request(db, id).await?;
        return Err(DomainError::InvalidTransition {
            from: current.status.as_str().to_string(),
            to: next.as_str().to_string(),
        });
    }

    tracing::info!("Request #{} moved to {}", id, status.as_str());
    get_request(db, id).await
}

/// Upvote from a fan-site voting page
pub async fn vote(db: &DatabaseConnection, id: i32) -> Result<request::Model, DomainError> {
    let result = Request::update_many()
        .col_expr(
            request::Column::Votes,
            Expr::col(request::Column::Votes).add(1),
        )
        .filter(request::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    get_request(db, id).await
}

pub async fn delete_request(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = Request::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    async fn pending_request(db: &DatabaseConnection) -> request::Model {
        create_request(
            db,
            NewRequest {
                title: "Karaoke relay".to_string(),
                description: "Three hours of anison".to_string(),
                request_type: RequestType::Song,
                priority: None,
                submitter_name: None,
                submitter_email: None,
                site: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_stale_transition_does_not_overwrite() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let created = pending_request(&db).await;

        // Another admin rejects it first
        transition_request(&db, created.id, RequestStatus::Rejected)
            .await
            .unwrap();

        // A click made against the PENDING view arrives afterwards
        let stale =
            transition_request_from(&db, created.id, RequestStatus::Pending, RequestStatus::Reviewing)
                .await;
        match stale {
            Err(DomainError::InvalidTransition { from, to }) => {
                assert_eq!(from, "REJECTED");
                assert_eq!(to, "REVIEWING");
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }

        let current = get_request(&db, created.id).await.unwrap();
        assert_eq!(current.status, RequestStatus::Rejected);
    }

    #[tokio::test]
    async fn test_transition_of_missing_request() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let result =
            transition_request_from(&db, 404, RequestStatus::Pending, RequestStatus::Reviewing).await;
        assert!(matches!(result, Err(DomainError::NotFound)));
    }
}
