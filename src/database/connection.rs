use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::errors::Result;

pub async fn get_db_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    tracing::info!("✅ Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        crate::errors::AppError::service(format!("Migration failed: {}", e))
    })?;
    tracing::info!("📂 Migrations up to date");

    Ok(pool)
}
