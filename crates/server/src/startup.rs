use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::notifications::{NotificationService, SeaOrmNotificationRepository};
use service::payments::gateway::{HttpPaymentGateway, PaymentGateway};
use service::payments::repository::SeaOrmPaymentStore;
use service::payments::PaymentService;

use crate::routes::{self, auth::{ServerAuthConfig, ServerState}};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the service objects into the shared state. Clients are constructed
/// here and injected explicitly so tests can substitute the gateway.
pub fn build_state(
    db: DatabaseConnection,
    cfg: &configs::AppConfig,
    gateway: Arc<dyn PaymentGateway>,
) -> ServerState {
    let payments = Arc::new(PaymentService::new(
        Arc::new(SeaOrmPaymentStore { db: db.clone() }),
        gateway,
        cfg.payments.currency.clone(),
    ));
    let notifications = Arc::new(NotificationService::new(Arc::new(
        SeaOrmNotificationRepository { db: db.clone() },
    )));
    ServerState {
        db,
        auth: ServerAuthConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
        },
        payments,
        notifications,
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = configs::AppConfig::load_or_env()?;

    let db = models::db::connect_with_config(&cfg.database).await?;

    let gateway = Arc::new(HttpPaymentGateway::new(
        cfg.payments.base_url.clone(),
        cfg.payments.secret_key.clone(),
    ));
    let state = build_state(db, &cfg, gateway);

    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
