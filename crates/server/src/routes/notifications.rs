use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Pagination;
use common::response::{Ack, ApiData};
use service::auth::domain::Identity;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListParams {
    pub unread_only: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/notifications", tag = "notifications",
    params(ListParams),
    responses(
        (status = 200, description = "Caller's notifications"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiData<Vec<models::notification::Model>>>, JsonApiError> {
    let page = Pagination {
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(20),
    };
    let rows = state
        .notifications
        .list(&identity, params.unread_only.unwrap_or(false), page)
        .await?;
    Ok(Json(ApiData::new(rows)))
}

#[utoipa::path(put, path = "/notifications/{id}/read", tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, JsonApiError> {
    state.notifications.mark_read(&identity, id).await?;
    Ok(Json(Ack::ok()))
}

#[utoipa::path(put, path = "/notifications/read-all", tag = "notifications",
    responses(
        (status = 200, description = "All marked read"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn mark_all_read(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Ack>, JsonApiError> {
    state.notifications.mark_all_read(&identity).await?;
    Ok(Json(Ack::ok()))
}
