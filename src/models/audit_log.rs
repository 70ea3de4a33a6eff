use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only record of a sensitive mutation. Rows are never updated,
/// only purged once older than the retention window.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub action: String, // HTTP method: 'POST', 'PUT', 'DELETE'
    pub resource: String,
    pub resource_id: Option<String>,
    pub payload: Option<String>, // JSON snapshot of the request body
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: AuditStatus,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(8))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    #[sea_orm(string_value = "SUCCESS")]
    Success,
    #[sea_orm(string_value = "FAILURE")]
    Failure,
}

impl AuditStatus {
    pub fn from_http_status(code: u16) -> Self {
        if code < 400 {
            AuditStatus::Success
        } else {
            AuditStatus::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_boundary_is_400() {
        assert_eq!(AuditStatus::from_http_status(200), AuditStatus::Success);
        assert_eq!(AuditStatus::from_http_status(399), AuditStatus::Success);
        assert_eq!(AuditStatus::from_http_status(400), AuditStatus::Failure);
        assert_eq!(AuditStatus::from_http_status(500), AuditStatus::Failure);
    }
}
