use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::{
    dto::categories::CategoryForm,
    entity::categories::{ActiveModel, Column, Entity as Categories, Model as CategoryModel},
    error::{AppError, AppResult},
    models::Category,
    state::AppState,
};

pub async fn list_active_categories(state: &AppState) -> AppResult<Vec<Category>> {
    let items = Categories::find()
        .filter(Column::Active.eq(true))
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();
    Ok(items)
}

pub async fn list_all_categories(state: &AppState) -> AppResult<Vec<Category>> {
    let items = Categories::find()
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();
    Ok(items)
}

pub async fn get_category(state: &AppState, id: i32) -> AppResult<Category> {
    Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(category_from_entity)
        .ok_or(AppError::NotFound)
}

pub async fn create_category(state: &AppState, form: CategoryForm) -> AppResult<Category> {
    let input = form.validate()?;
    let category = ActiveModel {
        id: NotSet,
        name: Set(input.name),
        sort_order: Set(input.sort_order),
        active: Set(input.active),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(category_id = category.id, "category created");
    Ok(category_from_entity(category))
}

pub async fn update_category(state: &AppState, id: i32, form: CategoryForm) -> AppResult<Category> {
    let input = form.validate()?;
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.name = Set(input.name);
    active.sort_order = Set(input.sort_order);
    active.active = Set(input.active);
    let category = active.update(&state.orm).await?;

    tracing::info!(category_id = category.id, "category updated");
    Ok(category_from_entity(category))
}

fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        sort_order: model.sort_order,
        active: model.active,
    }
}
