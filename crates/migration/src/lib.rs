//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user_account;
mod m20240101_000002_create_user_credentials;
mod m20240101_000003_create_service_request;
mod m20240101_000004_create_review;
mod m20240101_000005_create_notification;
mod m20240101_000006_create_payment_intent;
mod m20240101_000100_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user_account::Migration),
            Box::new(m20240101_000002_create_user_credentials::Migration),
            Box::new(m20240101_000003_create_service_request::Migration),
            Box::new(m20240101_000004_create_review::Migration),
            Box::new(m20240101_000005_create_notification::Migration),
            Box::new(m20240101_000006_create_payment_intent::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000100_add_indexes::Migration),
        ]
    }
}
