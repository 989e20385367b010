use crate::db::connect;
use crate::{notification, payment_intent, review, service_request, user_account};
use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn sample_request(customer_id: Uuid, status: service_request::RequestStatus) -> service_request::NewServiceRequest {
    service_request::NewServiceRequest {
        customer_id,
        shop_id: None,
        mechanic_id: None,
        pickup_driver_id: None,
        status,
        urgency: "normal".into(),
        service_type: "brake inspection".into(),
        description: "front brakes squeal under light braking".into(),
        pickup_address: "12 Elm Street".into(),
        dropoff_address: None,
        pickup_date: Utc::now().into(),
        estimated_cost: Some(120.0),
    }
}

#[tokio::test]
async fn test_user_account_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("crud_{}@example.com", Uuid::new_v4());
    let created = user_account::create(&db, &email, "Crud Tester", "customer").await?;
    assert_eq!(created.email, email);
    assert_eq!(created.role, "customer");

    let found = user_account::find_by_email(&db, &email).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    user_account::soft_delete(&db, created.id).await?;
    let soft_deleted = user_account::Entity::find_by_id(created.id).one(&db).await?;
    assert!(soft_deleted.and_then(|u| u.deleted_at).is_some());

    user_account::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_service_request_and_payment_intent() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("owner_{}@example.com", Uuid::new_v4());
    let customer = user_account::create(&db, &email, "Owner", "customer").await?;

    let request = service_request::create(
        &db,
        sample_request(customer.id, service_request::RequestStatus::Completed),
    )
    .await?;
    assert_eq!(request.status, "completed");
    assert_eq!(request.payment_status, service_request::PAYMENT_STATUS_UNPAID);

    let intent = payment_intent::create(
        &db,
        payment_intent::NewPaymentIntent {
            id: format!("pi_test_{}", Uuid::new_v4()),
            service_request_id: request.id,
            customer_id: customer.id,
            amount: 42.5,
            amount_minor: 4250,
            currency: "usd".into(),
            status: "requires_payment_method".into(),
        },
    )
    .await?;
    assert_eq!(intent.amount_minor, 4250);

    let by_request = payment_intent::Entity::find()
        .filter(payment_intent::Column::ServiceRequestId.eq(request.id))
        .all(&db)
        .await?;
    assert_eq!(by_request.len(), 1);

    // Cascade: deleting the account removes its request and the intent mirror.
    user_account::Entity::delete_by_id(customer.id).exec(&db).await?;
    let gone = service_request::Entity::find_by_id(request.id).one(&db).await?;
    assert!(gone.is_none());
    Ok(())
}

#[tokio::test]
async fn test_review_and_notification_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("author_{}@example.com", Uuid::new_v4());
    let author = user_account::create(&db, &email, "Author", "customer").await?;
    let shop_id = Uuid::new_v4();

    let bad = review::create(&db, review::ReviewTarget::Shop(shop_id), author.id, 6, None).await;
    assert!(bad.is_err());

    let ok = review::create(
        &db,
        review::ReviewTarget::Shop(shop_id),
        author.id,
        5,
        Some("quick turnaround".into()),
    )
    .await?;
    assert_eq!(ok.shop_id, Some(shop_id));
    assert_eq!(ok.driver_id, None);

    let note = notification::create(&db, author.id, "", "your car is ready").await?;
    assert_eq!(note.kind, "general");
    assert!(!note.is_read);

    user_account::Entity::delete_by_id(author.id).exec(&db).await?;
    Ok(())
}
