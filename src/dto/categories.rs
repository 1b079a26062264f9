use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, models::Category};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub sort_order: String,
    pub active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub sort_order: i32,
    pub active: bool,
}

impl CategoryForm {
    pub fn validate(self) -> Result<CategoryInput, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".into()));
        }

        let sort_order = match self.sort_order.trim() {
            "" => 0,
            raw => raw.parse::<i32>().map_err(|_| {
                AppError::Validation("Sort order must be a whole number".into())
            })?,
        };

        Ok(CategoryInput {
            name,
            sort_order,
            active: self.active.is_some(),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
