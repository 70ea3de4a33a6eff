use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::Workflow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub feedback_type: FeedbackType,
    pub message: String,
    /// 1-5 stars, NULL when not rated
    pub rating: Option<i32>,
    pub status: FeedbackStatus,
    pub response: Option<String>,
    pub submitter_name: Option<String>,
    pub submitter_email: Option<String>,
    pub site: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackType {
    #[sea_orm(string_value = "BUG")]
    Bug,
    #[sea_orm(string_value = "FEATURE")]
    Feature,
    #[sea_orm(string_value = "PRAISE")]
    Praise,
    #[sea_orm(string_value = "COMPLAINT")]
    Complaint,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "REVIEWING")]
    Reviewing,
    #[sea_orm(string_value = "RESPONDED")]
    Responded,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl Workflow for FeedbackStatus {
    fn available_transitions(self) -> &'static [Self] {
        use FeedbackStatus::*;
        match self {
            New => &[Reviewing],
            Reviewing => &[Responded],
            Responded => &[Closed],
            Closed => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            FeedbackStatus::New => "NEW",
            FeedbackStatus::Reviewing => "REVIEWING",
            FeedbackStatus::Responded => "RESPONDED",
            FeedbackStatus::Closed => "CLOSED",
        }
    }
}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[cfg(test)]
mod tests {
    use super::FeedbackStatus::*;
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_each_status_only_advances_one_step() {
        for status in FeedbackStatus::iter() {
            for next in status.available_transitions() {
                assert!(*next > status, "{:?} -> {:?} goes backwards", status, next);
            }
            assert!(status.available_transitions().len() <= 1);
        }
    }

    #[test]
    fn test_closed_renders_no_actions() {
        assert!(Closed.is_terminal());
        assert!(Closed.available_actions().is_empty());
    }

    #[test]
    fn test_cannot_skip_review() {
        assert!(!New.can_transition_to(Responded));
        assert!(!New.can_transition_to(Closed));
        assert!(!Reviewing.can_transition_to(Closed));
        assert!(Closed.transition(New).is_err());
    }
}
