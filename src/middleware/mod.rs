//! HTTP middleware: CORS, session guard and audit trail

pub mod audit;
pub mod cors;
pub mod session;

pub use audit::audit_middleware;
pub use cors::cors_layer;
pub use session::session_middleware;
