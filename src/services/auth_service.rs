use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::{
    dto::auth::LoginForm,
    entity::admins::{ActiveModel as AdminActive, Column as AdminCol, Entity as Admins, Model as AdminModel},
    error::{AppError, AppResult},
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(password_hash)
}

pub async fn ensure_admin<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> AppResult<bool> {
    let exist = Admins::find()
        .filter(AdminCol::Username.eq(username))
        .one(db)
        .await?;
    if exist.is_some() {
        return Ok(false);
    }

    AdminActive {
        id: NotSet,
        username: Set(username.to_owned()),
        password_hash: Set(hash_password(password)?),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    tracing::info!(username = %username, "seeded admin credential");
    Ok(true)
}

pub async fn login<C: ConnectionTrait>(db: &C, payload: LoginForm) -> AppResult<AdminModel> {
    let LoginForm { username, password } = payload;
    let admin = Admins::find()
        .filter(AdminCol::Username.eq(username.trim()))
        .one(db)
        .await?;

    let admin = match admin {
        Some(a) => a,
        None => {
            tracing::info!(username = %username, "login failed: unknown user");
            return Err(AppError::InvalidCredentials);
        }
    };

    let parsed_hash = PasswordHash::new(&admin.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::info!(username = %admin.username, "login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(admin_id = admin.id, "admin logged in");
    Ok(admin)
}
