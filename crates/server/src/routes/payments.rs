use axum::{extract::State, Extension, Json};

use common::response::ApiData;
use service::auth::domain::Identity;
use service::payments::{CreateIntentInput, CreatedIntent};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(post, path = "/create-payment-intent", tag = "payments",
    request_body = crate::openapi::CreateIntentRequest,
    responses(
        (status = 200, description = "Intent created"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Error")
    )
)]
pub async fn create_payment_intent(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<CreateIntentInput>,
) -> Result<Json<ApiData<CreatedIntent>>, JsonApiError> {
    let created = state.payments.create_intent(&identity, input).await?;
    Ok(Json(ApiData::new(created)))
}
