use axum::{extract::Query, Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use service::auth::domain::{Identity, Role};
use service::auth::gate;
use service::earnings::{self, EarningsFilter, EarningsReport};

use crate::errors::JsonApiError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct EarningsParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
}

#[utoipa::path(get, path = "/driver-earnings", tag = "earnings",
    params(EarningsParams),
    responses(
        (status = 200, description = "Earnings feed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn driver_earnings(
    Extension(identity): Extension<Identity>,
    Query(params): Query<EarningsParams>,
) -> Result<Json<EarningsReport>, JsonApiError> {
    gate::require_role(&identity, Role::Driver, "Only drivers can access earnings")?;

    let filter = EarningsFilter {
        start_date: params.start_date,
        end_date: params.end_date,
        search: params.search,
    };
    // Placeholder data source; only the response contract is stable.
    let report = earnings::generate_report(&mut rand::thread_rng(), Utc::now().date_naive(), &filter);
    Ok(Json(report))
}
