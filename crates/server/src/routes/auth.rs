use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use uuid::Uuid;

use common::response::{Ack, ApiData};
use service::auth::domain::{Identity, LoginInput, RegisterInput, Role};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{verify_token, AuthConfig, AuthService};
use service::notifications::NotificationService;
use service::payments::PaymentService;

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub payments: Arc<PaymentService>,
    pub notifications: Arc<NotificationService>,
}

impl ServerState {
    fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: Some(self.auth.jwt_secret.clone()),
                token_ttl_hours: self.auth.token_ttl_hours,
                password_algorithm: "argon2".into(),
            },
        )
    }
}

#[derive(Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token: String,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

fn map_auth_error(e: AuthError) -> JsonApiError {
    let details = Some(e.to_string());
    match e {
        AuthError::Validation(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", details),
        AuthError::Conflict => JsonApiError::new(StatusCode::CONFLICT, "Conflict", details),
        AuthError::Unauthorized | AuthError::NotFound => JsonApiError::unauthorized(details.unwrap_or_default()),
        AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
            JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Auth Failed", details)
        }
    }
}

#[utoipa::path(post, path = "/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 200, description = "Registered"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<ApiData<RegisterOutput>>, JsonApiError> {
    models::user_account::validate_email(&input.email)
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))?;
    models::user_account::validate_name(&input.name)
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))?;

    let user = state.auth_service().register(input).await.map_err(map_auth_error)?;
    Ok(Json(ApiData::new(RegisterOutput { user_id: user.id })))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged In"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<ApiData<LoginOutput>>), JsonApiError> {
    let session = state
        .auth_service()
        .login(input)
        .await
        .map_err(|e| JsonApiError::unauthorized(e.to_string()))?;
    let user = session.user;
    let token = session.token.ok_or_else(|| {
        JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Auth Failed", Some("token generation failed".into()))
    })?;

    let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);

    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, role: user.role, token };
    Ok((jar, Json(ApiData::new(out))))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Ack>) {
    let jar = jar.remove(Cookie::from(AUTH_COOKIE));
    (jar, Json(Ack::ok()))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth",
    responses(
        (status = 200, description = "Current account"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn me(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiData<MeOutput>>, JsonApiError> {
    let account = models::user_account::Entity::find_by_id(identity.user_id)
        .one(&state.db)
        .await
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some(e.to_string())))?
        .ok_or_else(|| JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("account not found".into())))?;
    Ok(Json(ApiData::new(MeOutput {
        user_id: account.id,
        email: account.email,
        name: account.name,
        role: account.role,
    })))
}

/// Global middleware: outside the whitelist, resolve `Authorization: Bearer
/// <token>` (cookie fallback) into an [`Identity`] request extension.
/// Missing or malformed credentials are rejected with 401 before any
/// data-store access. Role checks happen later, in the handlers.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    // Whitelist: health, login and register, docs, CORS preflight
    if path == "/health"
        || path == "/auth/login"
        || path == "/auth/register"
        || path == "/auth/logout"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let token = {
        let authz = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            match h.strip_prefix(prefix) {
                Some(rest) if !rest.is_empty() => rest.to_string(),
                _ => {
                    tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                    return Err(JsonApiError::unauthorized("invalid Authorization header"));
                }
            }
        } else {
            // Cookie fallback: parse the Cookie header for auth_token
            let cookie_header = req
                .headers()
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                let kv = part.trim();
                if let Some(rest) = kv.strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }

            match token_val {
                Some(t) if !t.is_empty() => t,
                _ => {
                    tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(JsonApiError::unauthorized("missing credentials"));
                }
            }
        }
    };

    match verify_token(&state.auth.jwt_secret, &token) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::unauthorized("invalid or expired token"))
        }
    }
}
