mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use vitalityboost::{
    cart::Cart,
    dto::orders::CheckoutForm,
    entity::orders::{ActiveModel as OrderActive, Entity as Orders},
    models::OrderStatus,
    payment::signature::signature_header,
    services::order_service,
    state::AppState,
};

const WEBHOOK_SECRET: &str = "whsec_test";

async fn setup_with_stripe() -> anyhow::Result<common::TestApp> {
    common::setup_with(|config| {
        config.payment.stripe_secret_key = Some("sk_test".to_string());
        config.payment.stripe_webhook_secret = Some(WEBHOOK_SECRET.to_string());
    })
    .await
}

async fn place_order(state: &AppState) -> anyhow::Result<String> {
    let id = common::insert_product(state, "A", 100, true, None).await?;
    let mut cart = Cart::default();
    cart.add(id, 1);
    let outcome = order_service::checkout(
        state,
        &mut cart,
        CheckoutForm {
            email: "x@y.no".into(),
            method: String::new(),
        },
    )
    .await?;
    Ok(outcome.order.id)
}

fn completed_event(session_id: &str, order_id: Option<&str>) -> String {
    serde_json::json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": { "object": { "id": session_id, "client_reference_id": order_id } }
    })
    .to_string()
}

fn signed(uri: &str, body: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::post(uri).header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("stripe-signature", signature);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

fn sign(body: &str) -> Option<String> {
    Some(signature_header(body.as_bytes(), WEBHOOK_SECRET, Utc::now().timestamp()).expect("sign"))
}

#[tokio::test]
async fn verified_notification_completes_order_once() -> anyhow::Result<()> {
    let app = setup_with_stripe().await?;
    let state = &app.state;
    let order_id = place_order(state).await?;

    let body = completed_event("cs_123", Some(&order_id));
    let response = common::send(state, signed("/webhook/payment", &body, sign(&body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&common::body_text(response).await)?;
    assert_eq!(json["data"]["status"], "completed");

    let order = order_service::get_order(state, &order_id).await?;
    assert_eq!(order.status, OrderStatus::Completed);

    // Redelivery through the alias route is a no-op.
    let response = common::send(state, signed("/webhook", &body, sign(&body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        order_service::get_order(state, &order_id).await?.status,
        OrderStatus::Completed
    );
    Ok(())
}

#[tokio::test]
async fn falls_back_to_provider_reference() -> anyhow::Result<()> {
    let app = setup_with_stripe().await?;
    let state = &app.state;
    let order_id = place_order(state).await?;

    let row = Orders::find_by_id(order_id.clone()).one(&state.orm).await?.expect("order");
    let mut active: OrderActive = row.into();
    active.provider_ref = Set(Some("cs_ref".to_string()));
    active.update(&state.orm).await?;

    let body = completed_event("cs_ref", None);
    let response = common::send(state, signed("/webhook/payment", &body, sign(&body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        order_service::get_order(state, &order_id).await?.status,
        OrderStatus::Completed
    );
    Ok(())
}

#[tokio::test]
async fn rejects_bad_signatures_without_side_effects() -> anyhow::Result<()> {
    let app = setup_with_stripe().await?;
    let state = &app.state;
    let order_id = place_order(state).await?;
    let body = completed_event("cs_123", Some(&order_id));

    let response = common::send(state, signed("/webhook/payment", &body, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let forged = signature_header(body.as_bytes(), "whsec_other", Utc::now().timestamp())?;
    let response = common::send(state, signed("/webhook/payment", &body, Some(forged))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let stale = signature_header(body.as_bytes(), WEBHOOK_SECRET, Utc::now().timestamp() - 3600)?;
    let response = common::send(state, signed("/webhook/payment", &body, Some(stale))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(
        order_service::get_order(state, &order_id).await?.status,
        OrderStatus::Created
    );
    Ok(())
}

#[tokio::test]
async fn signed_but_unreadable_payload_is_a_bad_request() -> anyhow::Result<()> {
    let app = setup_with_stripe().await?;
    let body = "{not json";
    let response = common::send(&app.state, signed("/webhook/payment", body, sign(body))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&common::body_text(response).await)?;
    let message = json["message"].as_str().unwrap_or_default();
    assert!(message.contains("payload"), "{message}");
    assert!(!message.contains("signature"), "{message}");
    Ok(())
}

#[tokio::test]
async fn unknown_order_and_other_events() -> anyhow::Result<()> {
    let app = setup_with_stripe().await?;
    let state = &app.state;

    let body = completed_event("cs_nope", Some("VB-unknown"));
    let response = common::send(state, signed("/webhook/payment", &body, sign(&body))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = serde_json::json!({
        "type": "payment_intent.created",
        "data": { "object": { "id": "pi_1" } }
    })
    .to_string();
    let response = common::send(state, signed("/webhook/payment", &body, sign(&body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn no_provider_means_service_unavailable() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let body = completed_event("cs_1", None);
    let response = common::send(&app.state, signed("/webhook/payment", &body, sign(&body))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
