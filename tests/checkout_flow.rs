mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::FakeProvider;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use vitalityboost::{
    cart::Cart,
    dto::orders::{CheckoutForm, CheckoutNext},
    entity::products::{ActiveModel as ProductActive, Entity as Products},
    error::AppError,
    middleware::session::SessionData,
    models::{OrderStatus, PaymentMethod},
    services::order_service,
};

fn form(email: &str, method: &str) -> CheckoutForm {
    CheckoutForm {
        email: email.to_string(),
        method: method.to_string(),
    }
}

#[tokio::test]
async fn checkout_writes_one_order_for_cart_total() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;

    let a = common::insert_product(state, "A", 100, true, None).await?;
    let b = common::insert_product(state, "B", 50, true, None).await?;
    let mut cart = Cart::default();
    cart.add(a, 2);
    cart.add(b, 1);

    let outcome = order_service::checkout(state, &mut cart, form("x@y.no", "")).await?;

    assert_eq!(outcome.order.amount, 250);
    assert_eq!(outcome.order.email, "x@y.no");
    assert_eq!(outcome.order.method, PaymentMethod::Unspecified);
    assert_eq!(outcome.order.status, OrderStatus::Created);
    assert_eq!(outcome.order.currency, "nok");
    assert!(outcome.order.id.starts_with("VB-"));
    assert_eq!(
        outcome.next,
        CheckoutNext::Confirmation(format!("/order/{}", outcome.order.id))
    );
    assert!(cart.is_empty());
    assert_eq!(common::order_count(state).await?, 1);

    let stored = order_service::get_order(state, &outcome.order.id).await?;
    assert_eq!(stored.amount, 250);
    Ok(())
}

#[tokio::test]
async fn empty_cart_writes_nothing() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;

    let mut cart = Cart::default();
    let result = order_service::checkout(state, &mut cart, form("x@y.no", "")).await;
    assert!(matches!(result, Err(AppError::EmptyCart)));

    // Only deleted products left: also empty.
    let id = common::insert_product(state, "Gone", 100, true, None).await?;
    cart.add(id, 1);
    Products::delete_by_id(id).exec(&state.orm).await?;
    let result = order_service::checkout(state, &mut cart, form("x@y.no", "")).await;
    assert!(matches!(result, Err(AppError::EmptyCart)));

    assert_eq!(common::order_count(state).await?, 0);
    Ok(())
}

#[tokio::test]
async fn invalid_input_writes_nothing() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let id = common::insert_product(state, "A", 100, true, None).await?;
    let mut cart = Cart::default();
    cart.add(id, 1);

    let result = order_service::checkout(state, &mut cart, form("not-an-email", "")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = order_service::checkout(state, &mut cart, form("x@y.no", "bitcoin")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    assert_eq!(common::order_count(state).await?, 0);
    assert_eq!(cart.quantity(id), Some(1));
    Ok(())
}

#[tokio::test]
async fn amount_uses_price_at_submission() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let id = common::insert_product(state, "A", 100, true, None).await?;

    let mut cart = Cart::default();
    cart.add(id, 3);

    let product = Products::find_by_id(id).one(&state.orm).await?.expect("product");
    let mut active: ProductActive = product.into();
    active.price = Set(120);
    active.update(&state.orm).await?;

    let outcome = order_service::checkout(state, &mut cart, form("x@y.no", "")).await?;
    assert_eq!(outcome.order.amount, 360);
    Ok(())
}

#[tokio::test]
async fn unavailable_methods_are_rejected_before_writing() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let id = common::insert_product(state, "A", 100, true, None).await?;
    let mut cart = Cart::default();
    cart.add(id, 1);

    // No provider configured.
    let result = order_service::checkout(state, &mut cart, form("x@y.no", "card")).await;
    assert!(matches!(result, Err(AppError::PaymentUnavailable)));

    // Simulated payments are switched off by default.
    let result = order_service::checkout(state, &mut cart, form("x@y.no", "simulated")).await;
    assert!(matches!(result, Err(AppError::PaymentUnavailable)));

    assert_eq!(common::order_count(state).await?, 0);
    assert!(!cart.is_empty());
    Ok(())
}

#[tokio::test]
async fn provider_checkout_records_reference_and_redirects() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let provider = Arc::new(FakeProvider::default());
    let state = common::with_fake_provider(&app.state, provider.clone());

    let a = common::insert_product(&state, "Omega 3", 19900, true, None).await?;
    let mut cart = Cart::default();
    cart.add(a, 2);

    let outcome = order_service::checkout(&state, &mut cart, form("x@y.no", "vipps")).await?;
    let order = outcome.order;

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.method, PaymentMethod::Vipps);
    assert_eq!(order.provider_ref, Some(format!("cs_{}", order.id)));
    assert_eq!(
        outcome.next,
        CheckoutNext::Provider(format!("https://pay.example/c/{}", order.id))
    );
    assert!(cart.is_empty());

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.order_id, order.id);
    assert_eq!(request.line_items.len(), 1);
    assert_eq!(request.line_items[0].unit_amount, 19900);
    assert_eq!(request.line_items[0].quantity, 2);
    assert_eq!(request.success_url, format!("http://127.0.0.1:3000/order/{}", order.id));
    assert_eq!(request.cancel_url, "http://127.0.0.1:3000/cart");
    Ok(())
}

#[tokio::test]
async fn provider_failure_leaves_pending_order_and_cart() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let provider = Arc::new(FakeProvider::failing());
    let state = common::with_fake_provider(&app.state, provider);

    let a = common::insert_product(&state, "A", 100, true, None).await?;
    let mut cart = Cart::default();
    cart.add(a, 1);

    let result = order_service::checkout(&state, &mut cart, form("x@y.no", "card")).await;
    assert!(matches!(result, Err(AppError::Payment(_))));
    assert_eq!(cart.quantity(a), Some(1));

    let orders = order_service::list_orders(&state, Default::default()).await?;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert_eq!(orders[0].provider_ref, None);
    Ok(())
}

#[tokio::test]
async fn completing_an_order_is_terminal() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let a = common::insert_product(state, "A", 100, true, None).await?;
    let mut cart = Cart::default();
    cart.add(a, 1);
    let placed = order_service::checkout(state, &mut cart, form("x@y.no", "")).await?.order;

    let first = order_service::complete_order(state, &placed.id).await?;
    assert_eq!(first.status, OrderStatus::Completed);

    let again = order_service::complete_order(state, &placed.id).await?;
    assert_eq!(again.status, OrderStatus::Completed);
    assert_eq!(again.id, first.id);

    assert!(matches!(
        order_service::complete_order(state, "VB-missing").await,
        Err(AppError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn checkout_route_clears_cookie_cart_and_redirects() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let state = &app.state;
    let a = common::insert_product(state, "A", 100, true, None).await?;

    let mut session = SessionData::default();
    session.cart.add(a, 2);
    let cookie = common::session_cookie(state, &session);

    let response = common::send(
        state,
        common::form("/checkout", Some(&cookie), "email=x%40y.no&method=unspecified"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = common::location(&response).expect("redirect");
    assert!(target.starts_with("/order/VB-"));
    let cookie = common::set_cookie(&response).expect("session cookie");

    let response = common::send(state, common::get("/api/cart", Some(&cookie))).await;
    let json: serde_json::Value = serde_json::from_str(&common::body_text(response).await)?;
    assert_eq!(json["data"]["item_count"], 0);

    let response = common::send(state, common::get(&target, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_text(response).await.contains("2.00 NOK"));

    let order_id = target.trim_start_matches("/order/");
    let response = common::send(state, common::get(&format!("/api/orders/{order_id}"), None)).await;
    let json: serde_json::Value = serde_json::from_str(&common::body_text(response).await)?;
    assert_eq!(json["data"]["amount"], 200);
    assert_eq!(json["data"]["status"], "created");
    assert!(json["data"].get("email").is_none());

    // Empty cart: 400 and nothing written.
    let response = common::send(
        state,
        common::form("/checkout", None, "email=x%40y.no&method=unspecified"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::order_count(state).await?, 1);
    Ok(())
}
