use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use common::pagination::Pagination;
use common::response::ApiData;
use service::auth::domain::Identity;
use service::jobs::{self, OwnRequestsQuery};
use models::service_request::RequestStatus;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct OwnRequestsParams {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(get, path = "/service-requests", tag = "requests",
    params(OwnRequestsParams),
    responses(
        (status = 200, description = "Caller's service requests"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<OwnRequestsParams>,
) -> Result<Json<ApiData<Vec<models::service_request::Model>>>, JsonApiError> {
    // Unparseable status values are ignored, matching the query builder's
    // unknown-parameter rule.
    let status = params.status.as_deref().and_then(RequestStatus::parse);
    let page = Pagination {
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(20),
    };
    let q = OwnRequestsQuery { status, page: Some(page) };
    let rows = jobs::list_own_requests(&state.db, &identity, &q).await?;
    Ok(Json(ApiData::new(rows)))
}
