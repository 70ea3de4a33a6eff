//! Feedback Service - fan feedback and its response pipeline

use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Deserialize;

use super::notification_service;
use super::{fetch_page, now, optional, required};
use crate::domain::{DomainError, PageParams, Paginated, Workflow};
use crate::models::NotificationType;
use crate::models::feedback::{
    self, Entity as Feedback, FeedbackStatus, FeedbackType, MAX_RATING, MIN_RATING,
};

#[derive(Debug, Default, Clone)]
pub struct FeedbackFilter {
    pub status: Option<FeedbackStatus>,
    pub feedback_type: Option<FeedbackType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFeedback {
    pub feedback_type: FeedbackType,
    pub message: String,
    pub rating: Option<i32>,
    pub submitter_name: Option<String>,
    pub submitter_email: Option<String>,
    pub site: Option<String>,
}

pub async fn list_feedback(
    db: &DatabaseConnection,
    filter: FeedbackFilter,
    params: PageParams,
) -> Result<Paginated<feedback::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(status) = filter.status {
        condition = condition.add(feedback::Column::Status.eq(status));
    }
    if let Some(feedback_type) = filter.feedback_type {
        condition = condition.add(feedback::Column::FeedbackType.eq(feedback_type));
    }

    let query = Feedback::find()
        .filter(condition)
        .order_by_desc(feedback::Column::CreatedAt)
        .order_by_desc(feedback::Column::Id);

    fetch_page(db, query, params).await
}

pub async fn get_feedback(db: &DatabaseConnection, id: i32) -> Result<feedback::Model, DomainError> {
    Feedback::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn create_feedback(
    db: &DatabaseConnection,
    input: NewFeedback,
) -> Result<feedback::Model, DomainError> {
    let message = required("message", &input.message)?;

    if let Some(rating) = input.rating
        && !(MIN_RATING..=MAX_RATING).contains(&rating)
    {
        return Err(DomainError::Validation(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    let timestamp = now();
    let model = feedback::ActiveModel {
        feedback_type: Set(input.feedback_type),
        message: Set(message),
        rating: Set(input.rating),
        status: Set(FeedbackStatus::New),
        response: Set(None),
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
        NotificationType::Feedback,
        "New feedback".to_string(),
        match model.rating {
            Some(r) => format!("{:?} feedback received ({}/5)", model.feedback_type, r),
            None => format!("{:?} feedback received", model.feedback_type),
        },
        Some(format!("/feedback/{}", model.id)),
    )
    .await;

    Ok(model)
}

/// Advance the response pipeline one step. A response text may accompany
/// the move to RESPONDED and is ignored for other targets.
pub async fn transition_feedback(
    db: &DatabaseConnection,
    id: i32,
    next: FeedbackStatus,
    response: Option<String>,
) -> Result<feedback::Model, DomainError> {
    let existing = get_feedback(db, id).await?;
    transition_feedback_from(db, id, existing.status, next, response).await
}

/// Move feedback from `expected` to `next`, guarded on the stored status
/// still being `expected`.
pub async fn transition_feedback_from(
    db: &DatabaseConnection,
    id: i32,
    expected: FeedbackStatus,
    next: FeedbackStatus,
    response: Option<String>,
) -> Result<feedback::Model, DomainError> {
    let status = expected.transition(next)?;

    let mut update = Feedback::update_many()
        .col_expr(feedback::Column::Status, Expr::value(status))
        .col_expr(feedback::Column::UpdatedAt, Expr::value(now()));
    if status == FeedbackStatus::Responded
        && let Some(text) = optional(response)
    {
        update = update.col_expr(feedback::Column::Response, Expr::value(Some(text)));
    }

    let result = update
        .filter(feedback::Column::Id.eq(id))
        .filter(feedback::Column::Status.eq(expected))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let current = get_feedback(db, id).await?;
        return Err(DomainError::InvalidTransition {
            from: current.status.as_str().to_string(),
            to: next.as_str().to_string(),
        });
    }

    tracing::info!("Feedback #{} moved to {}", id, status.as_str());
    get_feedback(db, id).await
}

pub async fn delete_feedback(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = Feedback::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}
