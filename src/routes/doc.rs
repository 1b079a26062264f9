use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{CartDto, CartLineDto},
        categories::CategoryList,
        orders::OrderStatusDto,
        products::ProductList,
        settings::StoreSettings,
    },
    middleware::session::SESSION_COOKIE_NAME,
    models::{Category, OrderStatus, PaymentMethod, Product},
    response::{ApiResponse, Meta},
    routes::{cart, health, orders, products, webhook},
};

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::list_categories,
        cart::cart_json,
        orders::get_order,
        webhook::payment_webhook
    ),
    components(
        schemas(
            Product,
            Category,
            PaymentMethod,
            OrderStatus,
            ProductList,
            CategoryList,
            CartDto,
            CartLineDto,
            OrderStatusDto,
            StoreSettings,
            webhook::WebhookAck,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CategoryList>,
            ApiResponse<CartDto>,
            ApiResponse<OrderStatusDto>
        )
    ),
    modifiers(&SessionCookieAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Visitor cart"),
        (name = "Orders", description = "Order status"),
        (name = "Payments", description = "Payment provider notifications"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
