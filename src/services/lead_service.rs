//! Lead Service - contact-form submissions and the sales pipeline

use sea_orm::*;
use serde::Deserialize;

use super::notification_service;
use super::{fetch_page, now, optional, required, validate_email};
use crate::domain::{DomainError, PageParams, Paginated};
use crate::models::lead::{self, Entity as Lead, LeadSource, LeadStatus};
use crate::models::NotificationType;

/// Filter parameters for listing leads
#[derive(Debug, Default, Clone)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub search: Option<String>,
}

/// Contact-form payload posted by the fan sites
#[derive(Debug, Clone, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub source: Option<LeadSource>,
    pub estimated_value: Option<f64>,
    pub site: Option<String>,
}

/// Admin edit of a lead; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadUpdate {
    pub status: Option<LeadStatus>,
    pub estimated_value: Option<f64>,
    pub notes: Option<String>,
}

pub async fn list_leads(
    db: &DatabaseConnection,
    filter: LeadFilter,
    params: PageParams,
) -> Result<Paginated<lead::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(status) = filter.status {
        condition = condition.add(lead::Column::Status.eq(status));
    }

    if let Some(source) = filter.source {
        condition = condition.add(lead::Column::Source.eq(source));
    }

    if let Some(q) = optional(filter.search) {
        condition = condition.add(
            Condition::any()
                .add(lead::Column::Name.contains(&q))
                .add(lead::Column::Email.contains(&q))
                .add(lead::Column::Company.contains(&q)),
        );
    }

    let query = Lead::find()
        .filter(condition)
        .order_by_desc(lead::Column::CreatedAt)
        .order_by_desc(lead::Column::Id);

    fetch_page(db, query, params).await
}

pub async fn get_lead(db: &DatabaseConnection, id: i32) -> Result<lead::Model, DomainError> {
    Lead::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

fn validate_value(value: Option<f64>) -> Result<Option<f64>, DomainError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(DomainError::Validation(
            "estimated_value must be a non-negative number".to_string(),
        )),
        other => Ok(other),
    }
}

pub async fn create_lead(db: &DatabaseConnection, input: NewLead) -> Result<lead::Model, DomainError> {
    let name = required("name", &input.name)?;
    let email = validate_email(&input.email)?;
    let message = required("message", &input.message)?;
    let estimated_value = validate_value(input.estimated_value)?;
    let timestamp = now();

    let model = lead::ActiveModel {
        name: Set(name),
        email: Set(email),
        company: Set(optional(input.company)),
        message: Set(message),
        source: Set(input.source.unwrap_or(LeadSource::Website)),
        status: Set(LeadStatus::New),
        estimated_value: Set(estimated_value),
        notes: Set(None),
        site: Set(optional(input.site)),
        created_at: Set(timestamp.clone()),
        updated_at: Set(timestamp),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("New lead #{} from {}", model.id, model.email);

    notification_service::broadcast(
        db,
        NotificationType::Lead,
        "New lead".to_string(),
        format!("{} submitted the contact form", model.name),
        Some(format!("/leads/{}", model.id)),
    )
    .await;

    Ok(model)
}

pub async fn update_lead(
    db: &DatabaseConnection,
    id: i32,
    input: LeadUpdate,
) -> Result<lead::Model, DomainError> {
    let existing = get_lead(db, id).await?;
    let mut active: lead::ActiveModel = existing.into();

    if let Some(status) = input.status {
        active.status = Set(status);
    }
    if input.estimated_value.is_some() {
        active.estimated_value = Set(validate_value(input.estimated_value)?);
    }
    if let Some(notes) = input.notes {
        active.notes = Set(optional(Some(notes)));
    }
    active.updated_at = Set(now());

    Ok(active.update(db).await?)
}

pub async fn delete_lead(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = Lead::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}
