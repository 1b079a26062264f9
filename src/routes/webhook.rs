use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::ApiResult,
    models::OrderStatus,
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

pub const SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
    pub order_id: Option<String>,
    pub status: Option<OrderStatus>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook/payment", post(payment_webhook))
        .route("/webhook", post(payment_webhook))
}

#[utoipa::path(
    post,
    path = "/webhook/payment",
    request_body(content = String, description = "Raw provider event, signed in the `Stripe-Signature` header"),
    responses(
        (status = 200, description = "Notification applied or acknowledged", body = ApiResponse<WebhookAck>),
        (status = 400, description = "Missing or invalid signature"),
        (status = 404, description = "Order not found"),
        (status = 503, description = "No payment provider configured"),
    ),
    tag = "Payments"
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<WebhookAck> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let order = order_service::handle_notification(&state, &body, signature).await?;
    let data = WebhookAck {
        received: true,
        order_id: order.as_ref().map(|o| o.id.clone()),
        status: order.as_ref().map(|o| o.status),
    };
    Ok(Json(ApiResponse::success("Received", data, Some(Meta::empty()))))
}
