//! Filtered reads over `service_request`: the available-jobs feed and the
//! caller-scoped request listing. Only whitelisted parameters ever reach the
//! query; anything else is ignored by the handlers.

use common::pagination::Pagination;
use models::service_request::{Column, Entity, Model, RequestStatus};
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};
use uuid::Uuid;

use crate::auth::domain::{Identity, Role};
use crate::errors::ServiceError;

/// Whitelisted filters for the available-jobs feed.
#[derive(Debug, Clone, Default)]
pub struct AvailableJobsQuery {
    pub shop_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Whitelisted filters for the caller-scoped request listing.
#[derive(Debug, Clone, Default)]
pub struct OwnRequestsQuery {
    pub status: Option<RequestStatus>,
    pub page: Option<Pagination>,
}

/// Escape LIKE wildcards in user-supplied search terms.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Build the available-jobs select: `status = accepted AND pickup_driver_id
/// IS NULL`, optionally narrowed by shop and a case-insensitive substring
/// match over service type, description and pickup address.
pub fn available_jobs_select(q: &AvailableJobsQuery) -> Select<Entity> {
    let mut cond = Condition::all()
        .add(Column::Status.eq(RequestStatus::Accepted.as_str()))
        .add(Column::PickupDriverId.is_null());

    if let Some(shop_id) = q.shop_id {
        cond = cond.add(Column::ShopId.eq(shop_id));
    }

    if let Some(term) = q.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        cond = cond.add(
            Condition::any()
                .add(Expr::col(Column::ServiceType).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern.clone()))
                .add(Expr::col(Column::PickupAddress).ilike(pattern)),
        );
    }

    Entity::find().filter(cond).order_by_asc(Column::PickupDate)
}

pub async fn list_available_jobs(
    db: &DatabaseConnection,
    q: &AvailableJobsQuery,
) -> Result<Vec<Model>, ServiceError> {
    available_jobs_select(q)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Build the listing of requests the caller participates in. Admin sees all
/// rows; every other role is scoped to its own participant column.
pub fn own_requests_select(identity: &Identity, q: &OwnRequestsQuery) -> Select<Entity> {
    let mut select = Entity::find();

    let scope = match identity.role {
        Role::Customer => Some(Column::CustomerId),
        Role::Driver => Some(Column::PickupDriverId),
        Role::Shop => Some(Column::ShopId),
        Role::Mechanic => Some(Column::MechanicId),
        Role::Admin => None,
    };
    if let Some(col) = scope {
        select = select.filter(col.eq(identity.user_id));
    }
    if let Some(status) = q.status {
        select = select.filter(Column::Status.eq(status.as_str()));
    }
    select.order_by_desc(Column::CreatedAt)
}

pub async fn list_own_requests(
    db: &DatabaseConnection,
    identity: &Identity,
    q: &OwnRequestsQuery,
) -> Result<Vec<Model>, ServiceError> {
    let (page_idx, per_page) = q.page.unwrap_or_default().normalize();
    own_requests_select(identity, q)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(select: Select<Entity>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn available_jobs_always_pins_status_and_unassigned_driver() {
        let s = sql(available_jobs_select(&AvailableJobsQuery::default()));
        assert!(s.contains(r#""status" = 'accepted'"#), "{s}");
        assert!(s.contains(r#""pickup_driver_id" IS NULL"#), "{s}");
        assert!(s.contains(r#"ORDER BY "service_request"."pickup_date" ASC"#), "{s}");
        assert!(!s.contains("ILIKE"), "{s}");
    }

    #[test]
    fn search_matches_three_fields_case_insensitively() {
        let q = AvailableJobsQuery { shop_id: None, search: Some("brake".into()) };
        let s = sql(available_jobs_select(&q));
        assert_eq!(s.matches("ILIKE").count(), 3, "{s}");
        assert!(s.contains("%brake%"), "{s}");
        // the narrowing filters stay in place
        assert!(s.contains(r#""status" = 'accepted'"#), "{s}");
        assert!(s.contains(r#""pickup_driver_id" IS NULL"#), "{s}");
    }

    #[test]
    fn shop_filter_is_an_equality() {
        let shop = Uuid::new_v4();
        let q = AvailableJobsQuery { shop_id: Some(shop), search: None };
        let s = sql(available_jobs_select(&q));
        assert!(s.contains(&shop.to_string()), "{s}");
    }

    #[test]
    fn blank_search_is_ignored() {
        let q = AvailableJobsQuery { shop_id: None, search: Some("   ".into()) };
        let s = sql(available_jobs_select(&q));
        assert!(!s.contains("ILIKE"), "{s}");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
    }

    #[test]
    fn own_requests_scope_follows_role() {
        let id = Uuid::new_v4();
        let q = OwnRequestsQuery::default();
        let s = sql(own_requests_select(&Identity::new(id, Role::Driver), &q));
        assert!(s.contains(r#""pickup_driver_id" ="#), "{s}");

        let s = sql(own_requests_select(&Identity::new(id, Role::Admin), &q));
        assert!(!s.contains("WHERE"), "{s}");
    }

    #[test]
    fn own_requests_status_filter_applies() {
        let q = OwnRequestsQuery { status: Some(RequestStatus::Completed), page: None };
        let s = sql(own_requests_select(&Identity::new(Uuid::new_v4(), Role::Customer), &q));
        assert!(s.contains(r#""status" = 'completed'"#), "{s}");
    }
}
