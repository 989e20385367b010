//! Create `review` table. A review targets a shop or a driver, never both.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(uuid(Review::Id).primary_key())
                    .col(ColumnDef::new(Review::ShopId).uuid().null())
                    .col(ColumnDef::new(Review::DriverId).uuid().null())
                    .col(uuid(Review::AuthorId).not_null())
                    .col(integer(Review::Rating).not_null())
                    .col(ColumnDef::new(Review::Comment).text().null())
                    .col(timestamp_with_time_zone(Review::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_author")
                            .from(Review::Table, Review::AuthorId)
                            .to(UserAccount::Table, UserAccount::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Review::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Review { Table, Id, ShopId, DriverId, AuthorId, Rating, Comment, CreatedAt }

#[derive(DeriveIden)]
enum UserAccount { Table, Id }
