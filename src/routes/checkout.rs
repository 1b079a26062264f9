use axum::{Form, Router, extract::State, response::Redirect, routing::post};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    dto::orders::{CheckoutForm, CheckoutNext},
    error::AppResult,
    middleware::session::VisitorSession,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout))
}

// The cookie is only rewritten on success, so a failed attempt keeps the cart.
pub async fn checkout(
    State(state): State<AppState>,
    mut session: VisitorSession,
    Form(payload): Form<CheckoutForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let outcome = order_service::checkout(&state, &mut session.data.cart, payload).await?;
    let target = match outcome.next {
        CheckoutNext::Provider(url) => url,
        CheckoutNext::Confirmation(path) => path,
    };
    Ok((session.save()?, Redirect::to(&target)))
}
