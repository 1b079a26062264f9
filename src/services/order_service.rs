use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    cart::{Cart, CartSummary},
    dto::{
        orders::{CheckoutForm, CheckoutNext, CheckoutOutcome},
        settings::StoreSettings,
    },
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    models::{Order, OrderStatus, PaymentMethod},
    payment::{CheckoutLineItem, CheckoutSessionRequest, PaymentNotification, PaymentProvider},
    routes::params::OrderListQuery,
    services::{cart_service, settings_service},
    state::AppState,
};

const MAX_EMAIL_LEN: usize = 254;

pub fn generate_order_id(now: DateTime<Utc>) -> String {
    format!("VB-{}-{}", now.format("%Y%m%d%H%M%S"), Uuid::new_v4().simple())
}

fn validate_email(raw: &str) -> AppResult<String> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    if email.len() > MAX_EMAIL_LEN || !email.contains('@') {
        return Err(AppError::Validation(format!("`{email}` is not a valid email address")));
    }
    Ok(email.to_string())
}

fn resolve_provider(
    state: &AppState,
    settings: &StoreSettings,
    method: PaymentMethod,
) -> AppResult<Option<Arc<dyn PaymentProvider>>> {
    if !settings.method_enabled(method) {
        return Err(AppError::PaymentUnavailable);
    }
    if !method.is_external() {
        return Ok(None);
    }

    state
        .payments
        .clone()
        .filter(|provider| provider.supports(method))
        .map(Some)
        .ok_or(AppError::PaymentUnavailable)
}

fn line_items(summary: &CartSummary) -> Vec<CheckoutLineItem> {
    summary
        .lines
        .iter()
        .map(|line| CheckoutLineItem {
            name: line.product.title.clone(),
            unit_amount: line.product.price,
            quantity: line.quantity,
        })
        .collect()
}

/// Places one order for the visitor's cart.
///
/// Nothing is written unless the cart resolves to at least one line and the
/// method is available. For provider-settled methods the order row is written
/// first; if the provider call then fails the row stays `pending` and the cart
/// is left as it was. On success the cart is cleared.
pub async fn checkout(
    state: &AppState,
    cart: &mut Cart,
    payload: CheckoutForm,
) -> AppResult<CheckoutOutcome> {
    let email = validate_email(&payload.email)?;
    let method: PaymentMethod = payload.method.parse().map_err(AppError::Validation)?;

    let summary = cart_service::view_cart(state, cart).await?;
    if summary.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let settings = settings_service::load(&state.orm).await?;
    let provider = resolve_provider(state, &settings, method)?;

    let now = Utc::now();
    let order = OrderActive {
        id: Set(generate_order_id(now)),
        email: Set(email.clone()),
        amount: Set(summary.total),
        currency: Set(state.currency().to_string()),
        method: Set(method.as_str().to_string()),
        status: Set(method.initial_status().as_str().to_string()),
        provider_ref: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(
        order_id = %order.id,
        amount = order.amount,
        method = %method,
        lines = summary.lines.len(),
        "order placed"
    );

    let (order, next) = match provider {
        Some(provider) => {
            let base = &state.config.public_base_url;
            let request = CheckoutSessionRequest {
                order_id: order.id.clone(),
                email,
                method,
                currency: order.currency.clone(),
                line_items: line_items(&summary),
                success_url: format!("{base}/order/{}", order.id),
                cancel_url: format!("{base}/cart"),
            };

            let redirect = match provider.create_checkout(&request).await {
                Ok(redirect) => redirect,
                Err(err) => {
                    tracing::warn!(
                        order_id = %order.id,
                        provider = provider.name(),
                        error = %err,
                        "hosted checkout failed; order left pending"
                    );
                    return Err(err.into());
                }
            };

            let mut active: OrderActive = order.into();
            active.provider_ref = Set(Some(redirect.session_id));
            active.updated_at = Set(Utc::now());
            let order = active.update(&state.orm).await?;

            tracing::info!(order_id = %order.id, provider = provider.name(), "hosted checkout created");
            (order, CheckoutNext::Provider(redirect.url))
        }
        None => {
            let confirmation = format!("/order/{}", order.id);
            (order, CheckoutNext::Confirmation(confirmation))
        }
    };

    cart.clear();
    Ok(CheckoutOutcome {
        order: order_from_entity(order)?,
        next,
    })
}

pub async fn get_order(state: &AppState, id: &str) -> AppResult<Order> {
    let order = Orders::find_by_id(id.to_owned()).one(&state.orm).await?;
    match order {
        Some(o) => order_from_entity(o),
        None => Err(AppError::NotFound),
    }
}

pub async fn list_orders(state: &AppState, query: OrderListQuery) -> AppResult<Vec<Order>> {
    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        let status: OrderStatus = status.parse().map_err(AppError::Validation)?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect()
}

/// Applies `created|pending -> completed`. An order that is already completed is returned unchanged.
pub async fn complete_order(state: &AppState, id: &str) -> AppResult<Order> {
    let existing = Orders::find_by_id(id.to_owned())
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    mark_completed(state, existing).await
}

async fn mark_completed(state: &AppState, existing: OrderModel) -> AppResult<Order> {
    let current = parse_status(&existing.status)?;
    if !current.can_transition_to(OrderStatus::Completed) {
        tracing::debug!(order_id = %existing.id, status = %current, "order already settled");
        return order_from_entity(existing);
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(OrderStatus::Completed.as_str().to_string());
    active.updated_at = Set(Utc::now());
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = %order.id, from = %current, "order completed");
    order_from_entity(order)
}

pub async fn handle_notification(
    state: &AppState,
    payload: &[u8],
    signature: Option<&str>,
) -> AppResult<Option<Order>> {
    let provider = state
        .payments
        .as_ref()
        .ok_or(AppError::PaymentUnavailable)?;

    match provider.parse_notification(payload, signature)? {
        PaymentNotification::CheckoutCompleted {
            session_id,
            order_id,
        } => {
            let mut order = None;
            if let Some(order_id) = order_id {
                order = Orders::find_by_id(order_id).one(&state.orm).await?;
            }
            if order.is_none() {
                order = Orders::find()
                    .filter(OrderCol::ProviderRef.eq(session_id.clone()))
                    .one(&state.orm)
                    .await?;
            }

            let Some(order) = order else {
                tracing::warn!(session_id = %session_id, "notification for unknown order");
                return Err(AppError::NotFound);
            };
            mark_completed(state, order).await.map(Some)
        }
        PaymentNotification::Other { event_type } => {
            tracing::info!(event_type = %event_type, "ignoring payment notification");
            Ok(None)
        }
    }
}

fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let method: PaymentMethod = model
        .method
        .parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;
    Ok(Order {
        status: parse_status(&model.status)?,
        method,
        id: model.id,
        email: model.email,
        amount: model.amount,
        currency: model.currency,
        provider_ref: model.provider_ref,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
