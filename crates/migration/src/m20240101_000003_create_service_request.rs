//! Create `service_request` table.
//!
//! Central marketplace row: one repair/pickup job with its participant
//! references, lifecycle status and cost fields.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRequest::Table)
                    .if_not_exists()
                    .col(uuid(ServiceRequest::Id).primary_key())
                    .col(uuid(ServiceRequest::CustomerId).not_null())
                    .col(ColumnDef::new(ServiceRequest::ShopId).uuid().null())
                    .col(ColumnDef::new(ServiceRequest::MechanicId).uuid().null())
                    .col(ColumnDef::new(ServiceRequest::PickupDriverId).uuid().null())
                    .col(string_len(ServiceRequest::Status, 32).not_null())
                    .col(string_len(ServiceRequest::Urgency, 32).not_null())
                    .col(string_len(ServiceRequest::ServiceType, 128).not_null())
                    .col(text(ServiceRequest::Description).not_null())
                    .col(string_len(ServiceRequest::PickupAddress, 255).not_null())
                    .col(
                        ColumnDef::new(ServiceRequest::DropoffAddress)
                            .string_len(255)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(ServiceRequest::PickupDate).not_null())
                    .col(ColumnDef::new(ServiceRequest::EstimatedCost).double().null())
                    .col(ColumnDef::new(ServiceRequest::FinalCost).double().null())
                    .col(string_len(ServiceRequest::PaymentStatus, 32).not_null())
                    .col(timestamp_with_time_zone(ServiceRequest::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceRequest::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_customer")
                            .from(ServiceRequest::Table, ServiceRequest::CustomerId)
                            .to(UserAccount::Table, UserAccount::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_pickup_driver")
                            .from(ServiceRequest::Table, ServiceRequest::PickupDriverId)
                            .to(UserAccount::Table, UserAccount::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceRequest::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceRequest {
    Table,
    Id,
    CustomerId,
    ShopId,
    MechanicId,
    PickupDriverId,
    Status,
    Urgency,
    ServiceType,
    Description,
    PickupAddress,
    DropoffAddress,
    PickupDate,
    EstimatedCost,
    FinalCost,
    PaymentStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserAccount { Table, Id }
