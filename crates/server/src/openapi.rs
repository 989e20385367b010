use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    /// customer | driver | shop | mechanic
    pub role: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub service_request_id: Uuid,
    pub amount: f64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::jobs::available_jobs,
        crate::routes::requests::list,
        crate::routes::payments::create_payment_intent,
        crate::routes::notifications::list,
        crate::routes::notifications::mark_read,
        crate::routes::notifications::mark_all_read,
        crate::routes::reviews::ratings,
        crate::routes::earnings::driver_earnings,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CreateIntentRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "jobs"),
        (name = "requests"),
        (name = "payments"),
        (name = "notifications"),
        (name = "reviews"),
        (name = "earnings")
    )
)]
pub struct ApiDoc;
