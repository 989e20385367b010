use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::service_request;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_intent")]
pub struct Model {
    /// External processor intent id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub service_request_id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ServiceRequest,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceRequest => Entity::belongs_to(service_request::Entity)
                .from(Column::ServiceRequestId)
                .to(service_request::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Mirror row for an intent already created at the processor.
#[derive(Debug, Clone)]
pub struct NewPaymentIntent {
    pub id: String,
    pub service_request_id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
}

pub async fn create(
    db: &DatabaseConnection,
    new: NewPaymentIntent,
) -> Result<Model, errors::ModelError> {
    if new.id.trim().is_empty() {
        return Err(errors::ModelError::Validation("intent id required".into()));
    }
    let am = ActiveModel {
        id: Set(new.id),
        service_request_id: Set(new.service_request_id),
        customer_id: Set(new.customer_id),
        amount: Set(new.amount),
        amount_minor: Set(new.amount_minor),
        currency: Set(new.currency),
        status: Set(new.status),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
