//! Services Layer
//!
//! Business logic extracted from HTTP handlers. Every service function takes
//! a `DatabaseConnection` and returns `Result<_, DomainError>`.

pub mod analytics_service;
pub mod audit_service;
pub mod content_service;
pub mod dashboard_service;
pub mod feedback_service;
pub mod lead_service;
pub mod notification_service;
pub mod request_service;
pub mod user_service;

use chrono::{SecondsFormat, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, Select};

use crate::domain::{DomainError, PageParams, Paginated};

/// Timestamp format used for every `created_at`/`updated_at` column.
/// Fixed-width so string comparison orders chronologically.
pub fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Run a select through SeaORM's paginator
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    params: PageParams,
) -> Result<Paginated<E::Model>, DomainError>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'static,
{
    let paginator = query.paginate(db, params.limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(params.index()).await?;
    Ok(Paginated::new(items, total, params))
}

/// Trim and reject blank required text fields
pub(crate) fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Normalize optional text: blank strings become NULL
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = required("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DomainError::Validation("email is invalid".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Aoba ").unwrap(), "Aoba");
        assert!(matches!(
            required("name", "   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_optional_blank_becomes_none() {
        assert_eq!(optional(Some("  ".to_string())), None);
        assert_eq!(optional(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(optional(None), None);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("fan@aoba-nekosora.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@nodomain.com").is_err());
        assert!(validate_email("user@localhost").is_err());
    }

    #[test]
    fn test_now_is_fixed_width_utc() {
        let ts = now();
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
    }
}
