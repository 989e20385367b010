//! External payment processor client behind a trait so handlers and tests
//! can substitute it.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ServiceError;

/// One charge-intent creation request, already converted to minor units.
#[derive(Debug, Clone)]
pub struct IntentRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub service_request_id: Uuid,
    pub customer_id: Uuid,
}

/// Processor-side view of a created intent.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayIntent {
    pub id: String,
    pub client_secret: String,
    pub status: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, req: &IntentRequest) -> Result<GatewayIntent, ServiceError>;
}

/// Client for the processor's REST API (form-encoded request, JSON reply,
/// bearer secret key).
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into(), secret_key: secret_key.into() }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_intent(&self, req: &IntentRequest) -> Result<GatewayIntent, ServiceError> {
        let url = format!("{}/v1/payment_intents", self.base_url.trim_end_matches('/'));
        let params = [
            ("amount", req.amount_minor.to_string()),
            ("currency", req.currency.clone()),
            ("metadata[service_request_id]", req.service_request_id.to_string()),
            ("metadata[customer_id]", req.customer_id.to_string()),
        ];
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Payment(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Payment(format!("processor returned {}: {}", status, body)));
        }
        resp.json::<GatewayIntent>()
            .await
            .map_err(|e| ServiceError::Payment(e.to_string()))
    }
}

/// In-memory mock gateway recording every request it sees.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockPaymentGateway {
        counter: AtomicU64,
        fail: AtomicBool,
        pub requests: Mutex<Vec<IntentRequest>>,
    }

    impl MockPaymentGateway {
        /// Make every subsequent call fail with a processor error.
        pub fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn created_count(&self) -> u64 {
            self.counter.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PaymentGateway for MockPaymentGateway {
        async fn create_intent(&self, req: &IntentRequest) -> Result<GatewayIntent, ServiceError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ServiceError::Payment("mock processor unavailable".into()));
            }
            self.requests.lock().unwrap().push(req.clone());
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(GatewayIntent {
                id: format!("pi_mock_{}", n),
                client_secret: format!("pi_mock_{}_secret", n),
                status: "requires_payment_method".into(),
            })
        }
    }
}
