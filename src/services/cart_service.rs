use crate::{
    cart::{self, Cart, CartSummary},
    dto::cart::{AddToCartForm, RemoveFromCartForm},
    error::{AppError, AppResult},
    services::product_service,
    state::AppState,
};

pub async fn add_to_cart(state: &AppState, cart: &mut Cart, payload: AddToCartForm) -> AppResult<u32> {
    let addition = payload.validate()?;
    if !product_service::product_exists(state, addition.product_id).await? {
        return Err(AppError::NotFound);
    }

    let quantity = cart.add(addition.product_id, addition.quantity);
    tracing::debug!(product_id = addition.product_id, quantity, "cart line updated");
    Ok(quantity)
}

pub fn remove_from_cart(cart: &mut Cart, payload: RemoveFromCartForm) -> AppResult<bool> {
    let product_id = payload.validate()?;
    let removed = cart.remove(product_id);
    if removed {
        tracing::debug!(product_id, "cart line removed");
    }
    Ok(removed)
}

pub async fn view_cart(state: &AppState, cart: &Cart) -> AppResult<CartSummary> {
    let products = product_service::find_by_ids(state, cart.product_ids()).await?;
    Ok(cart::summarize(cart, products))
}
