use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use common::response::ApiData;
use service::ratings::{self, RatingSummary, RatingTarget};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RatingsParams {
    pub shop_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
}

#[utoipa::path(get, path = "/reviews/ratings", tag = "reviews",
    params(RatingsParams),
    responses(
        (status = 200, description = "Rating summary"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn ratings(
    State(state): State<ServerState>,
    Query(params): Query<RatingsParams>,
) -> Result<Json<ApiData<RatingSummary>>, JsonApiError> {
    let target = match (params.shop_id, params.driver_id) {
        (Some(shop), None) => RatingTarget::Shop(shop),
        (None, Some(driver)) => RatingTarget::Driver(driver),
        _ => {
            return Err(JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "Validation Error",
                Some("exactly one of shop_id or driver_id is required".into()),
            ))
        }
    };
    let summary = ratings::summary_for(&state.db, target).await?;
    Ok(Json(ApiData::new(summary)))
}
