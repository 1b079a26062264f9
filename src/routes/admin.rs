use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::{
    dto::{
        categories::CategoryForm,
        products::ProductForm,
        settings::{SettingsForm, StoreSettings},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminSession,
    models::{Category, OrderStatus},
    routes::params::OrderListQuery,
    services::{
        category_service,
        image_service::{self, ImageUpload},
        order_service, product_service, settings_service,
    },
    state::AppState,
    views::{ImageView, OrderView, ProductFormValues, ProductView, SelectOption},
};

const RECENT_ORDERS: usize = 5;

#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub settings: StoreSettings,
    pub products: Vec<ProductView>,
    pub categories: Vec<Category>,
    pub images: Vec<ImageView>,
    pub recent_orders: Vec<OrderView>,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/product_form.html")]
pub struct ProductFormTemplate {
    pub heading: String,
    pub action: String,
    pub product_id: Option<i32>,
    pub values: ProductFormValues,
    pub categories: Vec<SelectOption>,
    pub images: Vec<SelectOption>,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/category_form.html")]
pub struct CategoryFormTemplate {
    pub heading: String,
    pub action: String,
    pub name: String,
    pub sort_order: String,
    pub active: bool,
    pub error: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
    pub statuses: Vec<SelectOption>,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/order_detail.html")]
pub struct OrderDetailTemplate {
    pub order: OrderView,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/products/new", get(new_product))
        .route("/products", post(create_product))
        .route("/products/{id}/edit", get(edit_product))
        .route("/products/{id}", post(update_product))
        .route("/products/{id}/delete", post(delete_product))
        .route("/categories/new", get(new_category))
        .route("/categories", post(create_category))
        .route("/categories/{id}/edit", get(edit_category))
        .route("/categories/{id}", post(update_category))
        .route("/settings", post(update_settings))
        .route("/images", post(upload_image))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(order_detail))
        .route("/orders/{id}/complete", post(complete_order))
}

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<DashboardTemplate> {
    let settings = settings_service::load(&state.orm).await?;
    let products = product_service::list_all_products(&state).await?;
    let categories = category_service::list_all_categories(&state).await?;
    let images = image_service::list_images(&state).await?;
    let orders = order_service::list_orders(&state, OrderListQuery::default()).await?;

    Ok(DashboardTemplate {
        settings,
        products: products
            .iter()
            .map(|p| ProductView::new(p, state.currency()))
            .collect(),
        categories,
        images: images.iter().map(ImageView::from).collect(),
        recent_orders: orders.iter().take(RECENT_ORDERS).map(OrderView::new).collect(),
    })
}

async fn render_product_form(
    state: &AppState,
    product_id: Option<i32>,
    values: ProductFormValues,
    error: Option<String>,
) -> AppResult<ProductFormTemplate> {
    let categories = category_service::list_all_categories(state).await?;
    let images = image_service::list_images(state).await?;

    let (heading, action) = match product_id {
        Some(id) => ("Edit product".to_string(), format!("/admin/products/{id}")),
        None => ("New product".to_string(), "/admin/products".to_string()),
    };

    Ok(ProductFormTemplate {
        heading,
        action,
        product_id,
        categories: SelectOption::categories(&categories, &values.category_id),
        images: SelectOption::images(&images, &values.image_id),
        values,
        error,
    })
}

async fn product_form_error(
    state: &AppState,
    product_id: Option<i32>,
    form: &ProductForm,
    err: AppError,
) -> AppResult<Response> {
    match err {
        AppError::Validation(message) => {
            let page =
                render_product_form(state, product_id, ProductFormValues::from(form), Some(message))
                    .await?;
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        other => Err(other),
    }
}

pub async fn new_product(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<ProductFormTemplate> {
    render_product_form(&state, None, ProductFormValues::blank(), None).await
}

pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Form(form): Form<ProductForm>,
) -> AppResult<Response> {
    match product_service::create_product(&state, form.clone()).await {
        Ok(_) => Ok(Redirect::to("/admin").into_response()),
        Err(err) => product_form_error(&state, None, &form, err).await,
    }
}

pub async fn edit_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> AppResult<ProductFormTemplate> {
    let product = product_service::get_product(&state, id).await?;
    render_product_form(&state, Some(id), ProductFormValues::from(&product), None).await
}

pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> AppResult<Response> {
    match product_service::update_product(&state, id, form.clone()).await {
        Ok(_) => Ok(Redirect::to("/admin").into_response()),
        Err(err) => product_form_error(&state, Some(id), &form, err).await,
    }
}

pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    product_service::delete_product(&state, id).await?;
    Ok(Redirect::to("/admin"))
}

fn category_form(
    category_id: Option<i32>,
    form: CategoryForm,
    error: Option<String>,
) -> CategoryFormTemplate {
    let (heading, action) = match category_id {
        Some(id) => ("Edit category".to_string(), format!("/admin/categories/{id}")),
        None => ("New category".to_string(), "/admin/categories".to_string()),
    };
    CategoryFormTemplate {
        heading,
        action,
        name: form.name,
        sort_order: form.sort_order,
        active: form.active.is_some(),
        error,
    }
}

fn category_form_error(
    category_id: Option<i32>,
    form: CategoryForm,
    err: AppError,
) -> AppResult<Response> {
    match err {
        AppError::Validation(message) => {
            let page = category_form(category_id, form, Some(message));
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        other => Err(other),
    }
}

pub async fn new_category(_admin: AdminSession) -> CategoryFormTemplate {
    let form = CategoryForm {
        sort_order: "0".to_string(),
        active: Some("on".to_string()),
        ..Default::default()
    };
    category_form(None, form, None)
}

pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    match category_service::create_category(&state, form.clone()).await {
        Ok(_) => Ok(Redirect::to("/admin").into_response()),
        Err(err) => category_form_error(None, form, err),
    }
}

pub async fn edit_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> AppResult<CategoryFormTemplate> {
    let category = category_service::get_category(&state, id).await?;
    let form = CategoryForm {
        name: category.name,
        sort_order: category.sort_order.to_string(),
        active: category.active.then(|| "on".to_string()),
    };
    Ok(category_form(Some(id), form, None))
}

pub async fn update_category(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    match category_service::update_category(&state, id, form.clone()).await {
        Ok(_) => Ok(Redirect::to("/admin").into_response()),
        Err(err) => category_form_error(Some(id), form, err),
    }
}

pub async fn update_settings(
    State(state): State<AppState>,
    _admin: AdminSession,
    Form(form): Form<SettingsForm>,
) -> AppResult<Redirect> {
    settings_service::update(&state.orm, form).await?;
    Ok(Redirect::to("/admin"))
}

pub async fn upload_image(
    State(state): State<AppState>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> AppResult<Redirect> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        upload = Some(ImageUpload {
            filename,
            content_type,
            data: data.to_vec(),
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::Validation("Choose a file to upload".into()))?;
    image_service::upload_image(&state, upload).await?;
    Ok(Redirect::to("/admin"))
}

pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<OrderListQuery>,
) -> AppResult<OrdersTemplate> {
    let selected = query.status.clone().unwrap_or_default();
    let orders = order_service::list_orders(&state, query).await?;

    let statuses = [OrderStatus::Created, OrderStatus::Pending, OrderStatus::Completed]
        .into_iter()
        .map(|status| SelectOption {
            value: status.as_str().to_string(),
            label: status.as_str().to_string(),
            selected: status.as_str() == selected.trim(),
        })
        .collect();

    Ok(OrdersTemplate {
        orders: orders.iter().map(OrderView::new).collect(),
        statuses,
    })
}

pub async fn order_detail(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> AppResult<OrderDetailTemplate> {
    let order = order_service::get_order(&state, &id).await?;
    Ok(OrderDetailTemplate {
        order: OrderView::new(&order),
    })
}

pub async fn complete_order(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let order = order_service::complete_order(&state, &id).await?;
    Ok(Redirect::to(&format!("/admin/orders/{}", order.id)))
}
