pub mod analytics;
pub mod audit;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod health;
pub mod leads;
pub mod notifications;
pub mod requests;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

/// Routes mounted under `/api`. Session, audit and CORS layers are applied by
/// `server::build_router` so they see the full request path.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_me))
        // Dashboard
        .route("/dashboard/stats", get(dashboard::get_stats))
        // Leads
        .route("/leads", get(leads::list_leads))
        .route(
            "/leads/:id",
            get(leads::get_lead)
                .put(leads::update_lead)
                .delete(leads::delete_lead),
        )
        // Requests
        .route("/requests", get(requests::list_requests))
        .route(
            "/requests/:id",
            get(requests::get_request).delete(requests::delete_request),
        )
        .route("/requests/:id/status", put(requests::update_request_status))
        // Feedback
        .route("/feedback", get(feedback::list_feedback))
        .route(
            "/feedback/:id",
            get(feedback::get_feedback).delete(feedback::delete_feedback),
        )
        .route("/feedback/:id/status", put(feedback::update_feedback_status))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route(
            "/notifications/:id",
            axum::routing::delete(notifications::delete_notification),
        )
        .route("/notifications/:id/read", put(notifications::mark_read))
        // Analytics
        .route("/analytics/content", get(analytics::content_analytics))
        .route(
            "/analytics/content/export",
            get(analytics::export_content_csv),
        )
        // Content
        .route(
            "/content",
            get(content::list_content).post(content::create_content),
        )
        .route(
            "/content/:id",
            get(content::get_content)
                .put(content::update_content)
                .delete(content::delete_content),
        )
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", axum::routing::delete(users::delete_user))
        // Audit trail
        .route(
            "/audit-logs",
            get(audit::list_audit_logs).delete(audit::purge_audit_logs),
        )
        // Fan-site submissions (no session)
        .route("/public/leads", post(leads::submit_lead))
        .route("/public/requests", post(requests::submit_request))
        .route("/public/requests/:id/vote", post(requests::vote_request))
        .route("/public/feedback", post(feedback::submit_feedback))
        .route("/public/content/:id/events", post(content::record_event))
}
