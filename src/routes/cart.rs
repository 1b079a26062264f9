use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json, Router,
    extract::State,
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    dto::cart::{AddToCartForm, CartDto, RemoveFromCartForm},
    error::{ApiResult, AppResult},
    middleware::session::VisitorSession,
    response::{ApiResponse, Meta},
    routes::storefront::load_chrome,
    services::cart_service,
    state::AppState,
    views::{CartView, Chrome, MethodOption, checkout_methods},
};

#[derive(Template, WebTemplate)]
#[template(path = "storefront/cart.html")]
pub struct CartTemplate {
    pub chrome: Chrome,
    pub cart: CartView,
    pub methods: Vec<MethodOption>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(show_cart))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/remove", post(remove_from_cart))
}

pub fn api_router() -> Router<AppState> {
    Router::new().route("/", get(cart_json))
}

pub async fn show_cart(
    State(state): State<AppState>,
    session: VisitorSession,
) -> AppResult<CartTemplate> {
    let summary = cart_service::view_cart(&state, &session.data.cart).await?;
    let chrome = load_chrome(&state, &session.data).await?;

    let payments = state.payments.clone();
    let methods = checkout_methods(&chrome.settings, |method| {
        payments.as_ref().is_some_and(|p| p.supports(method))
    });

    Ok(CartTemplate {
        cart: CartView::new(&summary, state.currency()),
        methods,
        chrome,
    })
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    mut session: VisitorSession,
    Form(payload): Form<AddToCartForm>,
) -> AppResult<(CookieJar, Redirect)> {
    cart_service::add_to_cart(&state, &mut session.data.cart, payload).await?;
    Ok((session.save()?, Redirect::to("/cart")))
}

pub async fn remove_from_cart(
    mut session: VisitorSession,
    Form(payload): Form<RemoveFromCartForm>,
) -> AppResult<(CookieJar, Redirect)> {
    cart_service::remove_from_cart(&mut session.data.cart, payload)?;
    Ok((session.save()?, Redirect::to("/cart")))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Visitor cart priced at current catalog prices", body = ApiResponse<CartDto>)
    ),
    security(("session_cookie" = [])),
    tag = "Cart"
)]
pub async fn cart_json(
    State(state): State<AppState>,
    session: VisitorSession,
) -> ApiResult<CartDto> {
    let summary = cart_service::view_cart(&state, &session.data.cart).await?;
    let lines = summary.lines.len();
    let data = CartDto::from_summary(summary, state.currency());
    Ok(Json(ApiResponse::success("Cart", data, Some(Meta::total(lines)))))
}
