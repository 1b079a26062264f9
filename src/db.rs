use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::{
    config::AppConfig,
    services::{auth_service, settings_service},
};

pub type OrmConn = DatabaseConnection;

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<OrmConn> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Apply the embedded SQL migrations from `migrations/`.
pub async fn run_migrations(conn: &OrmConn) -> Result<()> {
    let pool = conn.get_sqlite_connection_pool();
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn bootstrap(conn: &OrmConn, config: &AppConfig) -> Result<()> {
    let created = auth_service::ensure_admin(conn, &config.admin.username, &config.admin.password)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    if created && config.admin.is_default() {
        tracing::warn!("seeded admin with default credentials; set ADMIN_USERNAME/ADMIN_PASSWORD");
    }

    settings_service::seed_defaults(conn)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}
