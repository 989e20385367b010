//! Notification state updates. `is_read` is one-directional (`unread ->
//! read`); both mutations are idempotent.

use std::sync::Arc;

use async_trait::async_trait;
use common::pagination::Pagination;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::domain::Identity;
use crate::auth::gate;
use crate::errors::ServiceError;
use models::notification::{self, Column, Entity};

/// Repository abstraction for notification persistence.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<notification::Model>, ServiceError>;
    async fn mark_read(&self, id: Uuid) -> Result<(), ServiceError>;
    /// Mark every unread row of `user_id` read, returning how many changed.
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ServiceError>;
    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: Pagination,
    ) -> Result<Vec<notification::Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmNotificationRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl NotificationRepository for SeaOrmNotificationRepository {
    async fn find(&self, id: Uuid) -> Result<Option<notification::Model>, ServiceError> {
        Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), ServiceError> {
        Entity::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ServiceError> {
        let res = Entity::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: Pagination,
    ) -> Result<Vec<notification::Model>, ServiceError> {
        let (page_idx, per_page) = page.normalize();
        let mut select = Entity::find().filter(Column::UserId.eq(user_id));
        if unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }
        select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, per_page)
            .fetch_page(page_idx)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }
}

/// Service enforcing existence -> ownership -> update for single rows, and
/// the caller-scoped filter for the bulk path.
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(user_id = %identity.user_id, notification_id = %id))]
    pub async fn mark_read(&self, identity: &Identity, id: Uuid) -> Result<(), ServiceError> {
        let note = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("notification"))?;
        gate::require_owner(identity, note.user_id, "notifications can only be updated by their owner")?;
        if note.is_read {
            // already in the terminal state; repeat calls succeed silently
            return Ok(());
        }
        self.repo.mark_read(id).await
    }

    /// The `user_id` filter is itself the ownership boundary here; no per-row
    /// re-check is needed.
    #[instrument(skip(self), fields(user_id = %identity.user_id))]
    pub async fn mark_all_read(&self, identity: &Identity) -> Result<u64, ServiceError> {
        let changed = self.repo.mark_all_read(identity.user_id).await?;
        info!(changed, "notifications_marked_read");
        Ok(changed)
    }

    pub async fn list(
        &self,
        identity: &Identity,
        unread_only: bool,
        page: Pagination,
    ) -> Result<Vec<notification::Model>, ServiceError> {
        self.repo.list_for_user(identity.user_id, unread_only, page).await
    }
}

/// In-memory mock repository for tests.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockNotificationRepository {
        pub notes: Mutex<Vec<notification::Model>>,
    }

    impl MockNotificationRepository {
        pub fn with_notes(notes: Vec<notification::Model>) -> Self {
            Self { notes: Mutex::new(notes) }
        }
    }

    #[async_trait]
    impl NotificationRepository for MockNotificationRepository {
        async fn find(&self, id: Uuid) -> Result<Option<notification::Model>, ServiceError> {
            Ok(self.notes.lock().unwrap().iter().find(|n| n.id == id).cloned())
        }

        async fn mark_read(&self, id: Uuid) -> Result<(), ServiceError> {
            let mut notes = self.notes.lock().unwrap();
            for n in notes.iter_mut() {
                if n.id == id {
                    n.is_read = true;
                }
            }
            Ok(())
        }

        async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, ServiceError> {
            let mut notes = self.notes.lock().unwrap();
            let mut changed = 0;
            for n in notes.iter_mut() {
                if n.user_id == user_id && !n.is_read {
                    n.is_read = true;
                    changed += 1;
                }
            }
            Ok(changed)
        }

        async fn list_for_user(
            &self,
            user_id: Uuid,
            unread_only: bool,
            page: Pagination,
        ) -> Result<Vec<notification::Model>, ServiceError> {
            let (page_idx, per_page) = page.normalize();
            let mut rows: Vec<_> = self
                .notes
                .lock()
                .unwrap()
                .iter()
                .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows
                .into_iter()
                .skip((page_idx * per_page) as usize)
                .take(per_page as usize)
                .collect())
        }
    }
}
