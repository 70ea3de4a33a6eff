//! Dashboard landing-page counters

use sea_orm::*;
use serde::Serialize;

use super::notification_service;
use crate::domain::DomainError;
use crate::models::feedback::{self, Entity as Feedback, FeedbackStatus};
use crate::models::lead::{self, Entity as Lead, LeadStatus};
use crate::models::request::{self, Entity as Request, RequestStatus};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub new_leads: u64,
    pub open_leads: u64,
    /// Sum of estimated values over leads that are neither WON nor LOST
    pub pipeline_value: f64,
    pub pending_requests: u64,
    pub open_feedback: u64,
    pub unread_notifications: u64,
}

pub async fn stats(db: &DatabaseConnection, user_id: i32) -> Result<DashboardStats, DomainError> {
    let closed: Vec<LeadStatus> = LeadStatus::iter().filter(|s| s.is_closed()).collect();
    let open = Condition::all().add(lead::Column::Status.is_not_in(closed));

    let new_leads = Lead::find()
        .filter(lead::Column::Status.eq(LeadStatus::New))
        .count(db)
        .await?;
    let open_leads = Lead::find().filter(open.clone()).count(db).await?;

    let pipeline_value = Lead::find()
        .select_only()
        .column_as(lead::Column::EstimatedValue.sum(), "total")
        .filter(open)
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten();

    let pending_requests = Request::find()
        .filter(request::Column::Status.eq(RequestStatus::Pending))
        .count(db)
        .await?;

    let open_feedback = Feedback::find()
        .filter(feedback::Column::Status.ne(FeedbackStatus::Closed))
        .count(db)
        .await?;

    Ok(DashboardStats {
        new_leads,
        open_leads,
        pipeline_value: pipeline_value.unwrap_or(0.0),
        pending_requests,
        open_feedback,
        unread_notifications: notification_service::unread_count(db, user_id).await?,
    })
}
