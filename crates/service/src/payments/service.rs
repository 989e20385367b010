//! Payment intent orchestration. Preconditions are checked in a fixed
//! order, each with its own failure mode; only after all of them pass is
//! the external intent created and mirrored locally.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::gateway::{IntentRequest, PaymentGateway};
use super::repository::PaymentStore;
use crate::auth::domain::Identity;
use crate::auth::gate;
use crate::errors::ServiceError;
use models::payment_intent::NewPaymentIntent;
use models::service_request::RequestStatus;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentInput {
    #[serde(default)]
    pub service_request_id: Option<Uuid>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedIntent {
    pub client_secret: String,
}

pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl PaymentService {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        gateway: Arc<dyn PaymentGateway>,
        currency: impl Into<String>,
    ) -> Self {
        Self { store, gateway, currency: currency.into() }
    }

    /// Convert a major-unit amount to processor minor units.
    pub fn to_minor_units(amount: f64) -> i64 {
        (amount * 100.0).round() as i64
    }

    #[instrument(skip(self, input), fields(user_id = %identity.user_id))]
    pub async fn create_intent(
        &self,
        identity: &Identity,
        input: CreateIntentInput,
    ) -> Result<CreatedIntent, ServiceError> {
        // (2) required fields
        let (request_id, amount) = match (input.service_request_id, input.amount) {
            (Some(r), Some(a)) => (r, a),
            _ => {
                return Err(ServiceError::Validation(
                    "serviceRequestId and amount are required".into(),
                ))
            }
        };
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ServiceError::Validation("amount must be a positive number".into()));
        }

        // (3) referenced request exists
        let request = self
            .store
            .find_service_request(request_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("service request"))?;

        // (4) caller owns the request or is admin
        gate::require_owner_or_admin(
            identity,
            request.customer_id,
            "only the requesting customer can pay for this service request",
        )?;

        // (5) status must be payable
        let payable = RequestStatus::parse(&request.status).map(RequestStatus::payable);
        if payable != Some(true) {
            return Err(ServiceError::Validation(format!(
                "service request status '{}' is not payable",
                request.status
            )));
        }

        let amount_minor = Self::to_minor_units(amount);
        let intent = self
            .gateway
            .create_intent(&IntentRequest {
                amount_minor,
                currency: self.currency.clone(),
                service_request_id: request.id,
                customer_id: request.customer_id,
            })
            .await?;
        info!(intent_id = %intent.id, request_id = %request.id, amount_minor, "payment_intent_created");

        // The external intent exists from here on. A mirror failure below
        // leaves it dangling at the processor; there is no compensating
        // cancel, so log the id for reconciliation and surface the error.
        if let Err(e) = self
            .store
            .insert_intent(NewPaymentIntent {
                id: intent.id.clone(),
                service_request_id: request.id,
                customer_id: request.customer_id,
                amount,
                amount_minor,
                currency: self.currency.clone(),
                status: intent.status.clone(),
            })
            .await
        {
            error!(intent_id = %intent.id, err = %e, "failed to persist intent mirror after external create");
            return Err(e);
        }

        Ok(CreatedIntent { client_secret: intent.client_secret })
    }
}
