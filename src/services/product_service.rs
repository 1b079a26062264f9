use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::{
    dto::products::{ProductForm, ProductInput},
    entity::{
        categories::{Entity as Categories, Model as CategoryModel},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::Product,
    response::Meta,
    routes::params::ProductQuery,
    state::AppState,
};

pub async fn list_active_products(
    state: &AppState,
    category_id: Option<i32>,
) -> AppResult<Vec<Product>> {
    let mut condition = Condition::all().add(Column::Active.eq(true));
    if let Some(category_id) = category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    let items = Products::find()
        .filter(condition)
        .find_also_related(Categories)
        .order_by_asc(Column::Title)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, category)| product_from_entity(product, category))
        .collect();
    Ok(items)
}

pub async fn page_active_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<(Vec<Product>, Meta)> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(Column::Active.eq(true));
    if let Some(category_id) = query.category {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    let finder = Products::find().filter(condition);
    let total = finder.clone().count(&state.orm).await?;

    let items = finder
        .find_also_related(Categories)
        .order_by_asc(Column::Title)
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, category)| product_from_entity(product, category))
        .collect();

    Ok((items, Meta::new(page, limit, total)))
}

pub async fn list_all_products(state: &AppState) -> AppResult<Vec<Product>> {
    let items = Products::find()
        .find_also_related(Categories)
        .order_by_asc(Column::Title)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, category)| product_from_entity(product, category))
        .collect();
    Ok(items)
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<Product> {
    let result = Products::find_by_id(id)
        .find_also_related(Categories)
        .one(&state.orm)
        .await?;
    match result {
        Some((product, category)) => Ok(product_from_entity(product, category)),
        None => Err(AppError::NotFound),
    }
}

pub async fn product_exists(state: &AppState, id: i32) -> AppResult<bool> {
    let count = Products::find()
        .filter(Column::Id.eq(id))
        .count(&state.orm)
        .await?;
    Ok(count > 0)
}

pub async fn find_by_ids(state: &AppState, ids: Vec<i32>) -> AppResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let items = Products::find()
        .filter(Column::Id.is_in(ids))
        .find_also_related(Categories)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, category)| product_from_entity(product, category))
        .collect();
    Ok(items)
}

pub async fn create_product(state: &AppState, form: ProductForm) -> AppResult<Product> {
    let input = form.validate()?;
    let now = Utc::now();
    let product = ActiveModel {
        id: NotSet,
        title: Set(input.title),
        price: Set(input.price),
        active: Set(input.active),
        stock: Set(input.stock),
        category_id: Set(input.category_id),
        image_id: Set(input.image_id),
        short_desc: Set(input.short_desc),
        long_desc: Set(input.long_desc),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(product_id = product.id, price = product.price, "product created");
    get_product(state, product.id).await
}

pub async fn update_product(state: &AppState, id: i32, form: ProductForm) -> AppResult<Product> {
    let input = form.validate()?;
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    apply_input(&mut active, input);
    active.updated_at = Set(Utc::now());
    let product = active.update(&state.orm).await?;

    tracing::info!(product_id = product.id, "product updated");
    get_product(state, product.id).await
}

pub async fn delete_product(state: &AppState, id: i32) -> AppResult<()> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = id, "product deleted");
    Ok(())
}

fn apply_input(active: &mut ActiveModel, input: ProductInput) {
    active.title = Set(input.title);
    active.price = Set(input.price);
    active.active = Set(input.active);
    active.stock = Set(input.stock);
    active.category_id = Set(input.category_id);
    active.image_id = Set(input.image_id);
    active.short_desc = Set(input.short_desc);
    active.long_desc = Set(input.long_desc);
}

fn product_from_entity(model: ProductModel, category: Option<CategoryModel>) -> Product {
    Product {
        id: model.id,
        title: model.title,
        price: model.price,
        active: model.active,
        stock: model.stock,
        category_id: model.category_id,
        category_name: category.map(|c| c.name),
        image_id: model.image_id,
        short_desc: model.short_desc,
        long_desc: model.long_desc,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
