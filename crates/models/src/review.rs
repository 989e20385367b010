use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub shop_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub author_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Target of a review: a shop or a driver, never both.
#[derive(Debug, Clone, Copy)]
pub enum ReviewTarget {
    Shop(Uuid),
    Driver(Uuid),
}

pub async fn create(
    db: &DatabaseConnection,
    target: ReviewTarget,
    author_id: Uuid,
    rating: i32,
    comment: Option<String>,
) -> Result<Model, errors::ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(errors::ModelError::Validation("rating must be in 1..=5".into()));
    }
    let (shop_id, driver_id) = match target {
        ReviewTarget::Shop(id) => (Some(id), None),
        ReviewTarget::Driver(id) => (None, Some(id)),
    };
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop_id),
        driver_id: Set(driver_id),
        author_id: Set(author_id),
        rating: Set(rating),
        comment: Set(comment),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
