use std::collections::{HashMap, HashSet};

use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ConnectionTrait, EntityTrait, TransactionTrait};

use crate::{
    dto::settings::{self, DEFAULTS, SettingsForm, StoreSettings},
    entity::settings::{ActiveModel, Column, Entity as Settings},
    error::AppResult,
};

pub async fn load<C: ConnectionTrait>(db: &C) -> AppResult<StoreSettings> {
    let rows: HashMap<String, String> = Settings::find()
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.key, row.value))
        .collect();
    Ok(StoreSettings::from_map(&rows))
}

pub async fn get<C: ConnectionTrait>(db: &C, key: &str) -> AppResult<String> {
    let row = Settings::find_by_id(key.to_owned()).one(db).await?;
    Ok(row
        .map(|r| r.value)
        .or_else(|| settings::default_for(key).map(str::to_string))
        .unwrap_or_default())
}

pub async fn set<C: ConnectionTrait>(db: &C, key: &str, value: &str) -> AppResult<()> {
    let row = ActiveModel {
        key: Set(key.to_owned()),
        value: Set(value.to_owned()),
    };
    Settings::insert(row)
        .on_conflict(
            OnConflict::column(Column::Key)
                .update_column(Column::Value)
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

pub async fn update<C>(db: &C, form: SettingsForm) -> AppResult<StoreSettings>
where
    C: ConnectionTrait + TransactionTrait,
{
    let changes = form.validate()?;

    let txn = db.begin().await?;
    for (key, value) in &changes {
        match value {
            Some(value) => set(&txn, key, value).await?,
            None => {
                Settings::delete_by_id((*key).to_owned()).exec(&txn).await?;
            }
        }
    }
    txn.commit().await?;

    tracing::info!(keys = changes.len(), "settings updated");
    load(db).await
}

pub async fn seed_defaults<C: ConnectionTrait>(db: &C) -> AppResult<usize> {
    let existing: HashSet<String> = Settings::find()
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.key)
        .collect();

    let missing: Vec<ActiveModel> = DEFAULTS
        .iter()
        .filter(|(key, _)| !existing.contains(*key))
        .map(|(key, value)| ActiveModel {
            key: Set((*key).to_owned()),
            value: Set((*value).to_owned()),
        })
        .collect();

    let count = missing.len();
    if count > 0 {
        Settings::insert_many(missing).exec(db).await?;
        tracing::info!(count, "seeded default settings");
    }
    Ok(count)
}
