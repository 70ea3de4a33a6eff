//! Notification center: list, mark read, mark all read, delete
//!
//! A notification with `user_id = NULL` is a broadcast shown to every
//! dashboard user; its read flag is shared.

use sea_orm::sea_query::Expr;
use sea_orm::*;

use super::{fetch_page, now};
use crate::domain::{DomainError, PageParams, Paginated};
use crate::models::notification::{self, Entity as Notification, NotificationType};

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Option<i32>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}

/// Page of notifications plus the unread counter for the bell badge
#[derive(Debug)]
pub struct NotificationPage {
    pub page: Paginated<notification::Model>,
    pub unread_count: u64,
}

fn visible_to(user_id: i32) -> Condition {
    Condition::any()
        .add(notification::Column::UserId.eq(user_id))
        .add(notification::Column::UserId.is_null())
}

pub async fn create(
    db: &DatabaseConnection,
    input: NewNotification,
) -> Result<notification::Model, DomainError> {
    let model = notification::ActiveModel {
        user_id: Set(input.user_id),
        notification_type: Set(input.notification_type),
        title: Set(input.title),
        message: Set(input.message),
        link: Set(input.link),
        is_read: Set(false),
        created_at: Set(now()),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Best-effort broadcast used after public submissions. A failure here must
/// not fail the submission itself.
pub async fn broadcast(
    db: &DatabaseConnection,
    notification_type: NotificationType,
    title: String,
    message: String,
    link: Option<String>,
) {
    let input = NewNotification {
        user_id: None,
        notification_type,
        title,
        message,
        link,
    };
    if let Err(e) = create(db, input).await {
        tracing::error!("Failed to create notification: {}", e);
    }
}

pub async fn list(
    db: &DatabaseConnection,
    user_id: i32,
    unread_only: bool,
    params: PageParams,
) -> Result<NotificationPage, DomainError> {
    let mut query = Notification::find().filter(visible_to(user_id));
    if unread_only {
        query = query.filter(notification::Column::IsRead.eq(false));
    }
    let query = query
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id);

    let page = fetch_page(db, query, params).await?;
    let unread_count = unread_count(db, user_id).await?;

    Ok(NotificationPage { page, unread_count })
}

pub async fn unread_count(db: &DatabaseConnection, user_id: i32) -> Result<u64, DomainError> {
    Ok(Notification::find()
        .filter(visible_to(user_id))
        .filter(notification::Column::IsRead.eq(false))
        .count(db)
        .await?)
}

async fn find_visible(
    db: &DatabaseConnection,
    user_id: i32,
    id: i32,
) -> Result<notification::Model, DomainError> {
    Notification::find_by_id(id)
        .filter(visible_to(user_id))
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

/// Mark one notification read and return the new unread count
pub async fn mark_read(db: &DatabaseConnection, user_id: i32, id: i32) -> Result<u64, DomainError> {
    let existing = find_visible(db, user_id, id).await?;

    if !existing.is_read {
        let mut active: notification::ActiveModel = existing.into();
        active.is_read = Set(true);
        active.update(db).await?;
    }

    unread_count(db, user_id).await
}

/// Mark every visible notification read in a single statement.
/// Returns how many rows changed.
pub async fn mark_all_read(db: &DatabaseConnection, user_id: i32) -> Result<u64, DomainError> {
    let result = Notification::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(visible_to(user_id))
        .filter(notification::Column::IsRead.eq(false))
        .exec(db)
        .await?;

    tracing::debug!(
        "Marked {} notifications read for user {}",
        result.rows_affected,
        user_id
    );
    Ok(result.rows_affected)
}

pub async fn delete(db: &DatabaseConnection, user_id: i32, id: i32) -> Result<(), DomainError> {
    let existing = find_visible(db, user_id, id).await?;
    existing.delete(db).await?;
    Ok(())
}
