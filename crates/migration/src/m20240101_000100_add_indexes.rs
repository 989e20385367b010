use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ServiceRequest: the available-jobs filter hits (status, pickup_driver_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_request_status_driver")
                    .table(ServiceRequest::Table)
                    .col(ServiceRequest::Status)
                    .col(ServiceRequest::PickupDriverId)
                    .to_owned(),
            )
            .await?;

        // ServiceRequest: per-participant dashboards
        manager
            .create_index(
                Index::create()
                    .name("idx_request_customer")
                    .table(ServiceRequest::Table)
                    .col(ServiceRequest::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Notification: unread listing and bulk mark-all
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user_read")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::IsRead)
                    .to_owned(),
            )
            .await?;

        // Review: rating aggregation per shop / per driver
        manager
            .create_index(
                Index::create()
                    .name("idx_review_shop")
                    .table(Review::Table)
                    .col(Review::ShopId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_review_driver")
                    .table(Review::Table)
                    .col(Review::DriverId)
                    .to_owned(),
            )
            .await?;

        // PaymentIntent: lookup by service request
        manager
            .create_index(
                Index::create()
                    .name("idx_intent_request")
                    .table(PaymentIntent::Table)
                    .col(PaymentIntent::ServiceRequestId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_request_status_driver").table(ServiceRequest::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_request_customer").table(ServiceRequest::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notification_user_read").table(Notification::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_shop").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_driver").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_intent_request").table(PaymentIntent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceRequest { Table, Status, PickupDriverId, CustomerId }

#[derive(DeriveIden)]
enum Notification { Table, UserId, IsRead }

#[derive(DeriveIden)]
enum Review { Table, ShopId, DriverId }

#[derive(DeriveIden)]
enum PaymentIntent { Table, ServiceRequestId }
