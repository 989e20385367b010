use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::payment_intent::{self, NewPaymentIntent};
use models::service_request;

/// Persistence needed by the payment orchestrator: read the referenced
/// service request, insert the local intent mirror.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_service_request(
        &self,
        id: Uuid,
    ) -> Result<Option<service_request::Model>, ServiceError>;
    async fn insert_intent(
        &self,
        new: NewPaymentIntent,
    ) -> Result<payment_intent::Model, ServiceError>;
}

/// SeaORM-backed store implementation.
pub struct SeaOrmPaymentStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl PaymentStore for SeaOrmPaymentStore {
    async fn find_service_request(
        &self,
        id: Uuid,
    ) -> Result<Option<service_request::Model>, ServiceError> {
        service_request::get(&self.db, id).await.map_err(ServiceError::from)
    }

    async fn insert_intent(
        &self,
        new: NewPaymentIntent,
    ) -> Result<payment_intent::Model, ServiceError> {
        payment_intent::create(&self.db, new).await.map_err(ServiceError::from)
    }
}

/// In-memory mock store for tests.
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockPaymentStore {
        requests: Mutex<HashMap<Uuid, service_request::Model>>,
        fail_insert: AtomicBool,
        pub intents: Mutex<Vec<payment_intent::Model>>,
    }

    impl MockPaymentStore {
        pub fn with_request(request: service_request::Model) -> Self {
            let store = Self::default();
            store.requests.lock().unwrap().insert(request.id, request);
            store
        }

        pub fn add_request(&self, request: service_request::Model) {
            self.requests.lock().unwrap().insert(request.id, request);
        }

        /// Make the mirror insert fail, simulating the reconciliation gap.
        pub fn set_fail_insert(&self, fail: bool) {
            self.fail_insert.store(fail, Ordering::SeqCst);
        }

        pub fn intent_count(&self) -> usize {
            self.intents.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PaymentStore for MockPaymentStore {
        async fn find_service_request(
            &self,
            id: Uuid,
        ) -> Result<Option<service_request::Model>, ServiceError> {
            Ok(self.requests.lock().unwrap().get(&id).cloned())
        }

        async fn insert_intent(
            &self,
            new: NewPaymentIntent,
        ) -> Result<payment_intent::Model, ServiceError> {
            if self.fail_insert.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("mock insert failure".into()));
            }
            let model = payment_intent::Model {
                id: new.id,
                service_request_id: new.service_request_id,
                customer_id: new.customer_id,
                amount: new.amount,
                amount_minor: new.amount_minor,
                currency: new.currency,
                status: new.status,
                created_at: Utc::now().into(),
            };
            self.intents.lock().unwrap().push(model.clone());
            Ok(model)
        }
    }
}
