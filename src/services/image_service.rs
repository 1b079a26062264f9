use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::{
    entity::images::{ActiveModel, Column, Entity as Images, Model as ImageModel},
    error::{AppError, AppResult},
    models::ImageMeta,
    state::AppState,
};

pub const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

const MAX_FILENAME_LEN: usize = 120;

#[derive(Debug)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(MAX_FILENAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

pub async fn upload_image(state: &AppState, upload: ImageUpload) -> AppResult<ImageMeta> {
    let content_type = upload.content_type.trim().to_ascii_lowercase();
    if !SUPPORTED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported image type `{content_type}`"
        )));
    }
    if upload.data.is_empty() {
        return Err(AppError::Validation("The uploaded file is empty".into()));
    }
    if upload.data.len() > state.config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "Images may be at most {} bytes",
            state.config.max_upload_bytes
        )));
    }

    let size = upload.data.len();
    let image = ActiveModel {
        id: NotSet,
        filename: Set(sanitize_filename(&upload.filename)),
        content_type: Set(content_type),
        data: Set(upload.data),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(image_id = image.id, size, content_type = %image.content_type, "image uploaded");
    Ok(ImageMeta {
        id: image.id,
        filename: image.filename,
        content_type: image.content_type,
        created_at: image.created_at,
    })
}

pub async fn list_images(state: &AppState) -> AppResult<Vec<ImageMeta>> {
    let items = Images::find()
        .select_only()
        .column(Column::Id)
        .column(Column::Filename)
        .column(Column::ContentType)
        .column(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .into_model::<ImageMeta>()
        .all(&state.orm)
        .await?;
    Ok(items)
}

pub async fn get_image(state: &AppState, id: i32) -> AppResult<ImageModel> {
    Images::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_lose_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\vit c.png"), "vitc.png");
        assert_eq!(sanitize_filename(".hidden.jpg"), "hidden.jpg");
        assert_eq!(sanitize_filename("<>"), "upload");
    }
}
