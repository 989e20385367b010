use std::fmt;

use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::user_account;

pub const PAYMENT_STATUS_UNPAID: &str = "unpaid";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub mechanic_id: Option<Uuid>,
    pub pickup_driver_id: Option<Uuid>,
    pub status: String,
    pub urgency: String,
    pub service_type: String,
    pub description: String,
    pub pickup_address: String,
    pub dropoff_address: Option<String>,
    pub pickup_date: DateTimeWithTimeZone,
    pub estimated_cost: Option<f64>,
    pub final_cost: Option<f64>,
    pub payment_status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(user_account::Entity)
                .from(Column::CustomerId)
                .to(user_account::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle status of a service request. Stored as a plain string column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
    Accepted,
    PendingPayment,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Assigned => "assigned",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::Accepted => "accepted",
            RequestStatus::PendingPayment => "pending_payment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "assigned" => Some(RequestStatus::Assigned),
            "in_progress" => Some(RequestStatus::InProgress),
            "completed" => Some(RequestStatus::Completed),
            "cancelled" => Some(RequestStatus::Cancelled),
            "accepted" => Some(RequestStatus::Accepted),
            "pending_payment" => Some(RequestStatus::PendingPayment),
            _ => None,
        }
    }

    /// Statuses a payment intent may be created for.
    pub fn payable(self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::PendingPayment)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for inserting a request row; used by tests and by the parts of the
/// platform that own request lifecycle.
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub customer_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub mechanic_id: Option<Uuid>,
    pub pickup_driver_id: Option<Uuid>,
    pub status: RequestStatus,
    pub urgency: String,
    pub service_type: String,
    pub description: String,
    pub pickup_address: String,
    pub dropoff_address: Option<String>,
    pub pickup_date: DateTimeWithTimeZone,
    pub estimated_cost: Option<f64>,
}

pub async fn create(
    db: &DatabaseConnection,
    new: NewServiceRequest,
) -> Result<Model, errors::ModelError> {
    if new.service_type.trim().is_empty() {
        return Err(errors::ModelError::Validation("service_type required".into()));
    }
    if new.pickup_address.trim().is_empty() {
        return Err(errors::ModelError::Validation("pickup_address required".into()));
    }
    if new.urgency.trim().is_empty() {
        return Err(errors::ModelError::Validation("urgency required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(new.customer_id),
        shop_id: Set(new.shop_id),
        mechanic_id: Set(new.mechanic_id),
        pickup_driver_id: Set(new.pickup_driver_id),
        status: Set(new.status.as_str().to_string()),
        urgency: Set(new.urgency),
        service_type: Set(new.service_type),
        description: Set(new.description),
        pickup_address: Set(new.pickup_address),
        dropoff_address: Set(new.dropoff_address),
        pickup_date: Set(new.pickup_date),
        estimated_cost: Set(new.estimated_cost),
        final_cost: Set(None),
        payment_status: Set(PAYMENT_STATUS_UNPAID.into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::RequestStatus;

    #[test]
    fn status_roundtrip() {
        for s in [
            RequestStatus::Pending,
            RequestStatus::Assigned,
            RequestStatus::InProgress,
            RequestStatus::Completed,
            RequestStatus::Cancelled,
            RequestStatus::Accepted,
            RequestStatus::PendingPayment,
        ] {
            assert_eq!(RequestStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(RequestStatus::parse("shipped"), None);
    }

    #[test]
    fn only_completed_and_pending_payment_are_payable() {
        assert!(RequestStatus::Completed.payable());
        assert!(RequestStatus::PendingPayment.payable());
        for s in [
            RequestStatus::Pending,
            RequestStatus::Assigned,
            RequestStatus::InProgress,
            RequestStatus::Cancelled,
            RequestStatus::Accepted,
        ] {
            assert!(!s.payable(), "{} must not be payable", s);
        }
    }
}
