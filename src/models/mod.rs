pub mod audit_log;
pub mod content;
pub mod content_event;
pub mod feedback;
pub mod lead;
pub mod notification;
pub mod request;
pub mod user;

pub use audit_log::AuditStatus;
pub use content::ContentType;
pub use feedback::{FeedbackStatus, FeedbackType};
pub use lead::{LeadSource, LeadStatus};
pub use notification::NotificationType;
pub use request::{RequestPriority, RequestStatus, RequestType};
