use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::Workflow;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub request_type: RequestType,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    pub votes: i32,
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
pub enum RequestType {
    #[sea_orm(string_value = "FEATURE")]
    Feature,
    #[sea_orm(string_value = "CONTENT")]
    Content,
    #[sea_orm(string_value = "COLLABORATION")]
    Collaboration,
    #[sea_orm(string_value = "SONG")]
    Song,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestPriority {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "URGENT")]
    Urgent,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "REVIEWING")]
    Reviewing,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl Workflow for RequestStatus {
    fn available_transitions(self) -> &'static [Self] {
        use RequestStatus::*;
        match self {
            Pending => &[Reviewing, Rejected],
            Reviewing => &[Approved, Rejected],
            Approved => &[InProgress],
            InProgress => &[Completed],
            Rejected | Completed => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Reviewing => "REVIEWING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::InProgress => "IN_PROGRESS",
            RequestStatus::Completed => "COMPLETED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RequestStatus::*;
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_pending_offers_review_or_reject() {
        assert_eq!(Pending.available_transitions(), &[Reviewing, Rejected]);
        assert_eq!(Pending.available_actions(), vec!["REVIEWING", "REJECTED"]);
    }

    #[test]
    fn test_full_happy_path() {
        let mut status = Pending;
        for next in [Reviewing, Approved, InProgress, Completed] {
            status = status.transition(next).expect("valid step");
        }
        assert_eq!(status, Completed);
        assert!(status.is_terminal());
    }

    #[test]
    fn test_terminal_states_have_no_actions() {
        assert!(Rejected.is_terminal());
        assert!(Completed.is_terminal());
        assert!(Completed.available_actions().is_empty());
    }

    #[test]
    fn test_skipping_steps_is_rejected() {
        assert!(!Pending.can_transition_to(Approved));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Reviewing.can_transition_to(InProgress));
        assert!(Pending.transition(InProgress).is_err());
    }

    #[test]
    fn test_no_status_can_reenter_itself() {
        for status in RequestStatus::iter() {
            assert!(!status.can_transition_to(status), "{:?}", status);
        }
    }

    #[test]
    fn test_pending_is_reachable_from_nowhere() {
        for status in RequestStatus::iter() {
            assert!(!status.can_transition_to(Pending));
        }
    }
}
