pub mod gateway;
pub mod repository;
pub mod service;

pub use service::{CreateIntentInput, CreatedIntent, PaymentService};
