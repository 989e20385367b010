use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use models::service_request::{NewServiceRequest, RequestStatus};
use server::routes;
use server::startup::build_state;
use service::payments::gateway::mock::MockPaymentGateway;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

async fn build_app() -> anyhow::Result<(Router, DatabaseConnection, Arc<MockPaymentGateway>)> {
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    let mut cfg = configs::AppConfig::default();
    cfg.auth.jwt_secret = "test-secret".into();

    let gateway = Arc::new(MockPaymentGateway::default());
    let state = build_state(db.clone(), &cfg, gateway.clone());
    Ok((routes::build_router(state, cors()), db, gateway))
}

fn req(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn call(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().call(request).await.unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Register + login, returning (user_id, token).
async fn signup(app: &Router, role: &str) -> anyhow::Result<(Uuid, String)> {
    let email = format!("{}_{}@example.com", role, Uuid::new_v4());
    let password = "S3curePass!";

    let resp = call(
        app,
        req(
            "POST",
            "/auth/register",
            None,
            Some(json!({"email": email, "name": "Tester", "password": password, "role": role})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    let user_id: Uuid = v["data"]["user_id"].as_str().unwrap().parse()?;

    let resp = call(
        app,
        req("POST", "/auth/login", None, Some(json!({"email": email, "password": password}))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    let token = v["data"]["token"].as_str().unwrap().to_string();
    Ok((user_id, token))
}

fn base_request(customer_id: Uuid, marker: &str, status: RequestStatus) -> NewServiceRequest {
    NewServiceRequest {
        customer_id,
        shop_id: None,
        mechanic_id: None,
        pickup_driver_id: None,
        status,
        urgency: "normal".into(),
        service_type: "brake service".into(),
        description: format!("{} front pads and rotors", marker),
        pickup_address: "12 Elm Street".into(),
        dropoff_address: None,
        pickup_date: Utc::now().into(),
        estimated_cost: Some(250.0),
    }
}

#[tokio::test]
async fn test_available_jobs_invariant_and_search() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, db, _) = build_app().await?;

    let (customer_id, customer_token) = signup(&app, "customer").await?;
    let (driver_id, driver_token) = signup(&app, "driver").await?;

    // unique marker scopes the search to rows seeded by this run
    let marker = format!("mk{}", Uuid::new_v4().simple());

    let mut early = base_request(customer_id, &marker, RequestStatus::Accepted);
    early.pickup_date = (Utc::now() - Duration::days(2)).into();
    let early = models::service_request::create(&db, early).await?;
    let late = models::service_request::create(
        &db,
        base_request(customer_id, &marker, RequestStatus::Accepted),
    )
    .await?;

    // ineligible: already has a driver
    let mut taken = base_request(customer_id, &marker, RequestStatus::Accepted);
    taken.pickup_driver_id = Some(driver_id);
    let taken = models::service_request::create(&db, taken).await?;
    // ineligible: wrong status
    let pending =
        models::service_request::create(&db, base_request(customer_id, &marker, RequestStatus::Pending))
            .await?;

    // role gate: customers are rejected, anonymous callers are unauthorized
    let resp = call(&app, req("GET", "/available-jobs", Some(&customer_token), None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = call(&app, req("GET", "/available-jobs", None, None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let uri = format!("/available-jobs?search={}", marker);
    let resp = call(&app, req("GET", &uri, Some(&driver_token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["success"], true);
    let rows = v["data"].as_array().unwrap();

    let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&early.id.to_string().as_str()));
    assert!(ids.contains(&late.id.to_string().as_str()));
    assert!(!ids.contains(&taken.id.to_string().as_str()));
    assert!(!ids.contains(&pending.id.to_string().as_str()));

    for row in rows {
        assert_eq!(row["status"], "accepted");
        assert!(row["pickup_driver_id"].is_null());
    }
    // ascending by pickup date: the older row comes first
    assert_eq!(rows[0]["id"], early.id.to_string());

    // unknown query parameters are ignored, not rejected
    let uri = format!("/available-jobs?search={}&sort=desc&bogus=1", marker);
    let resp = call(&app, req("GET", &uri, Some(&driver_token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_notification_ownership_and_idempotency() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, db, _) = build_app().await?;

    let (owner_id, owner_token) = signup(&app, "customer").await?;
    let (_, other_token) = signup(&app, "customer").await?;

    let note = models::notification::create(&db, owner_id, "status", "your car is ready").await?;
    let uri = format!("/notifications/{}/read", note.id);

    let resp = call(&app, req("PUT", &uri, Some(&other_token), None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = call(&app, req("PUT", &uri, Some(&owner_token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    // idempotent repeat
    let resp = call(&app, req("PUT", &uri, Some(&owner_token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let missing = format!("/notifications/{}/read", Uuid::new_v4());
    let resp = call(&app, req("PUT", &missing, Some(&owner_token), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let _ = models::notification::create(&db, owner_id, "status", "invoice available").await?;
    let resp = call(&app, req("PUT", "/notifications/read-all", Some(&owner_token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call(&app, req("GET", "/notifications?unread_only=true", Some(&owner_token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["data"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn test_create_payment_intent_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, db, gateway) = build_app().await?;

    let (customer_id, customer_token) = signup(&app, "customer").await?;
    let (_, stranger_token) = signup(&app, "customer").await?;

    let payable = models::service_request::create(
        &db,
        base_request(customer_id, "payable", RequestStatus::Completed),
    )
    .await?;
    let unpayable = models::service_request::create(
        &db,
        base_request(customer_id, "unpayable", RequestStatus::Accepted),
    )
    .await?;

    // unauthenticated
    let resp = call(
        &app,
        req("POST", "/create-payment-intent", None, Some(json!({"serviceRequestId": payable.id, "amount": 42.5}))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // missing fields
    let resp = call(
        &app,
        req("POST", "/create-payment-intent", Some(&customer_token), Some(json!({"amount": 42.5}))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // unknown request
    let resp = call(
        &app,
        req(
            "POST",
            "/create-payment-intent",
            Some(&customer_token),
            Some(json!({"serviceRequestId": Uuid::new_v4(), "amount": 42.5})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // not the owning customer
    let resp = call(
        &app,
        req(
            "POST",
            "/create-payment-intent",
            Some(&stranger_token),
            Some(json!({"serviceRequestId": payable.id, "amount": 42.5})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // non-payable status
    let resp = call(
        &app,
        req(
            "POST",
            "/create-payment-intent",
            Some(&customer_token),
            Some(json!({"serviceRequestId": unpayable.id, "amount": 42.5})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gateway.created_count(), 0);

    // the happy path charges minor units and returns the client secret
    let resp = call(
        &app,
        req(
            "POST",
            "/create-payment-intent",
            Some(&customer_token),
            Some(json!({"serviceRequestId": payable.id, "amount": 42.5})),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["success"], true);
    assert!(v["data"]["clientSecret"].as_str().unwrap().contains("secret"));

    let recorded = gateway.requests.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].amount_minor, 4250);
    Ok(())
}

#[tokio::test]
async fn test_shop_rating_summary() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, db, _) = build_app().await?;

    let (author_id, token) = signup(&app, "customer").await?;
    let shop_id = Uuid::new_v4();
    for rating in [5, 5, 4, 3] {
        models::review::create(&db, models::review::ReviewTarget::Shop(shop_id), author_id, rating, None)
            .await?;
    }

    let uri = format!("/reviews/ratings?shop_id={}", shop_id);
    let resp = call(&app, req("GET", &uri, Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["data"]["averageRating"], 4.3);
    assert_eq!(v["data"]["totalReviews"], 4);
    assert_eq!(v["data"]["ratingDistribution"]["5"], 2);
    assert_eq!(v["data"]["ratingDistribution"]["1"], 0);

    // neither or both targets is a validation error
    let resp = call(&app, req("GET", "/reviews/ratings", Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_driver_earnings_contract() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let (app, _, _) = build_app().await?;

    let (_, driver_token) = signup(&app, "driver").await?;
    let (_, customer_token) = signup(&app, "customer").await?;

    let resp = call(&app, req("GET", "/driver-earnings", Some(&customer_token), None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = call(&app, req("GET", "/driver-earnings", Some(&driver_token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert!(v["earnings"].is_array());
    let count = v["summary"]["count"].as_u64().unwrap();
    assert_eq!(count, v["earnings"].as_array().unwrap().len() as u64);
    Ok(())
}
