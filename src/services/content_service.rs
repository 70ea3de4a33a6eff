//! Content Service - published items and the events fan sites report on them

use sea_orm::*;
use serde::Deserialize;

use super::{fetch_page, now, optional, required};
use crate::domain::{DomainError, PageParams, Paginated};
use crate::models::content::{self, ContentType, Entity as Content};
use crate::models::content_event::{self, Entity as ContentEvent, is_known_event_type};

#[derive(Debug, Default, Clone)]
pub struct ContentFilter {
    pub content_type: Option<ContentType>,
    pub character: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentInput {
    pub title: String,
    pub content_type: ContentType,
    pub character: String,
    pub url: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub event_type: String,
    pub source: Option<String>,
}

pub async fn list_content(
    db: &DatabaseConnection,
    filter: ContentFilter,
    params: PageParams,
) -> Result<Paginated<content::Model>, DomainError> {
    let mut condition = Condition::all();
    if let Some(content_type) = filter.content_type {
        condition = condition.add(content::Column::ContentType.eq(content_type));
    }
    if let Some(character) = optional(filter.character) {
        condition = condition.add(content::Column::CharacterName.eq(character));
    }

    let query = Content::find()
        .filter(condition)
        .order_by_desc(content::Column::CreatedAt)
        .order_by_desc(content::Column::Id);

    fetch_page(db, query, params).await
}

pub async fn get_content(db: &DatabaseConnection, id: i32) -> Result<content::Model, DomainError> {
    Content::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

pub async fn create_content(
    db: &DatabaseConnection,
    input: ContentInput,
) -> Result<content::Model, DomainError> {
    let timestamp = now();
    let model = content::ActiveModel {
        title: Set(required("title", &input.title)?),
        content_type: Set(input.content_type),
        character_name: Set(required("character", &input.character)?),
        url: Set(optional(input.url)),
        published_at: Set(optional(input.published_at)),
        created_at: Set(timestamp.clone()),
        updated_at: Set(timestamp),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

pub async fn update_content(
    db: &DatabaseConnection,
    id: i32,
    input: ContentInput,
) -> Result<content::Model, DomainError> {
    let existing = get_content(db, id).await?;
    let mut active: content::ActiveModel = existing.into();

    active.title = Set(required("title", &input.title)?);
    active.content_type = Set(input.content_type);
    active.character_name = Set(required("character", &input.character)?);
    active.url = Set(optional(input.url));
    active.published_at = Set(optional(input.published_at));
    active.updated_at = Set(now());

    Ok(active.update(db).await?)
}

/// Delete an item together with its recorded events
pub async fn delete_content(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let txn = db.begin().await?;

    ContentEvent::delete_many()
        .filter(content_event::Column::ContentId.eq(id))
        .exec(&txn)
        .await?;
    let result = Content::delete_by_id(id).exec(&txn).await?;

    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(DomainError::NotFound);
    }

    txn.commit().await?;
    Ok(())
}

pub async fn record_event(
    db: &DatabaseConnection,
    content_id: i32,
    input: NewEvent,
) -> Result<content_event::Model, DomainError> {
    let event_type = input.event_type.trim().to_lowercase();
    if !is_known_event_type(&event_type) {
        return Err(DomainError::Validation(format!(
            "unknown event type '{}'",
            event_type
        )));
    }

    // 404 for events on unknown content rather than an FK error
    get_content(db, content_id).await?;

    let source = optional(input.source)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "direct".to_string());

    let model = content_event::ActiveModel {
        content_id: Set(content_id),
        event_type: Set(event_type),
        source: Set(source),
        created_at: Set(now()),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}
