//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no Axum).
//! Status workflows, pagination math and domain error types.

pub mod errors;
pub mod pagination;
pub mod workflow;

pub use errors::DomainError;
pub use pagination::{PageParams, Paginated};
pub use workflow::Workflow;
