//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod auth;
pub mod earnings;
pub mod errors;
pub mod jobs;
pub mod notifications;
pub mod payments;
pub mod ratings;
