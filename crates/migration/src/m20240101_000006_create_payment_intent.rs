//! Create `payment_intent` table.
//!
//! Local mirror of processor-side intents, keyed by the external intent id.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentIntent::Table)
                    .if_not_exists()
                    .col(string_len(PaymentIntent::Id, 128).primary_key())
                    .col(uuid(PaymentIntent::ServiceRequestId).not_null())
                    .col(uuid(PaymentIntent::CustomerId).not_null())
                    .col(double(PaymentIntent::Amount).not_null())
                    .col(big_integer(PaymentIntent::AmountMinor).not_null())
                    .col(string_len(PaymentIntent::Currency, 8).not_null())
                    .col(string_len(PaymentIntent::Status, 32).not_null())
                    .col(timestamp_with_time_zone(PaymentIntent::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_intent_request")
                            .from(PaymentIntent::Table, PaymentIntent::ServiceRequestId)
                            .to(ServiceRequest::Table, ServiceRequest::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_intent_customer")
                            .from(PaymentIntent::Table, PaymentIntent::CustomerId)
                            .to(UserAccount::Table, UserAccount::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PaymentIntent::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PaymentIntent { Table, Id, ServiceRequestId, CustomerId, Amount, AmountMinor, Currency, Status, CreatedAt }

#[derive(DeriveIden)]
enum ServiceRequest { Table, Id }

#[derive(DeriveIden)]
enum UserAccount { Table, Id }
