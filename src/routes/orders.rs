use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::orders::OrderStatusDto,
    error::ApiResult,
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = String, Path, description = "Order ID, e.g. VB-20250101120000-...")
    ),
    responses(
        (status = 200, description = "Order status without contact details", body = ApiResponse<OrderStatusDto>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OrderStatusDto> {
    let order = order_service::get_order(&state, &id).await?;
    Ok(Json(ApiResponse::success(
        "Order",
        OrderStatusDto::from(order),
        Some(Meta::empty()),
    )))
}
