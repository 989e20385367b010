use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::response::ApiData;
use service::auth::domain::{Identity, Role};
use service::auth::gate;
use service::jobs::{self, AvailableJobsQuery};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AvailableJobsParams {
    pub shop_id: Option<Uuid>,
    pub search: Option<String>,
}

#[utoipa::path(get, path = "/available-jobs", tag = "jobs",
    params(AvailableJobsParams),
    responses(
        (status = 200, description = "Available jobs"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn available_jobs(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<AvailableJobsParams>,
) -> Result<Json<ApiData<Vec<models::service_request::Model>>>, JsonApiError> {
    gate::require_role(&identity, Role::Driver, "Only drivers can access available jobs")?;

    let q = AvailableJobsQuery { shop_id: params.shop_id, search: params.search };
    let rows = jobs::list_available_jobs(&state.db, &q).await?;
    info!(count = rows.len(), driver_id = %identity.user_id, "available_jobs_listed");
    Ok(Json(ApiData::new(rows)))
}
