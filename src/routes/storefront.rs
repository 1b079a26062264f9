use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    routing::get,
};

use crate::{
    error::AppResult,
    middleware::session::{SessionData, VisitorSession},
    routes::params::CatalogQuery,
    services::{category_service, image_service, order_service, product_service, settings_service},
    state::AppState,
    views::{Chrome, OrderView, ProductView},
};

#[derive(Template, WebTemplate)]
#[template(path = "storefront/index.html")]
pub struct IndexTemplate {
    pub chrome: Chrome,
    pub products: Vec<ProductView>,
    pub heading: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "storefront/product.html")]
pub struct ProductTemplate {
    pub chrome: Chrome,
    pub product: ProductView,
}

#[derive(Template, WebTemplate)]
#[template(path = "storefront/order.html")]
pub struct OrderTemplate {
    pub chrome: Chrome,
    pub order: OrderView,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/product/{id}", get(product_detail))
        .route("/order/{id}", get(order_confirmation))
        .route("/images/{id}", get(image))
}

pub async fn load_chrome(state: &AppState, session: &SessionData) -> AppResult<Chrome> {
    let settings = settings_service::load(&state.orm).await?;
    let categories = if settings.show_categories {
        category_service::list_active_categories(state).await?
    } else {
        Vec::new()
    };
    Ok(Chrome {
        settings,
        cart_count: session.cart.item_count(),
        categories,
    })
}

pub async fn index(
    State(state): State<AppState>,
    session: VisitorSession,
    Query(query): Query<CatalogQuery>,
) -> AppResult<IndexTemplate> {
    let chrome = load_chrome(&state, &session.data).await?;
    let products = product_service::list_active_products(&state, query.category).await?;

    let heading = query
        .category
        .and_then(|id| chrome.categories.iter().find(|c| c.id == id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "All products".to_string());

    Ok(IndexTemplate {
        products: products
            .iter()
            .map(|p| ProductView::new(p, state.currency()))
            .collect(),
        heading,
        chrome,
    })
}

pub async fn product_detail(
    State(state): State<AppState>,
    session: VisitorSession,
    Path(id): Path<i32>,
) -> AppResult<ProductTemplate> {
    let product = product_service::get_product(&state, id).await?;
    let chrome = load_chrome(&state, &session.data).await?;
    Ok(ProductTemplate {
        chrome,
        product: ProductView::new(&product, state.currency()),
    })
}

pub async fn order_confirmation(
    State(state): State<AppState>,
    session: VisitorSession,
    Path(id): Path<String>,
) -> AppResult<OrderTemplate> {
    let order = order_service::get_order(&state, &id).await?;
    let chrome = load_chrome(&state, &session.data).await?;
    Ok(OrderTemplate {
        chrome,
        order: OrderView::new(&order),
    })
}

pub async fn image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, HeaderMap, Vec<u8>)> {
    let image = image_service::get_image(&state, id).await?;

    let mut headers = HeaderMap::new();
    if let Ok(content_type) = HeaderValue::from_str(&image.content_type) {
        headers.insert(header::CONTENT_TYPE, content_type);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    );

    Ok((StatusCode::OK, headers, image.data))
}
