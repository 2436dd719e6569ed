//! Database module
//!
//! Connection and schema verification utilities. Schema changes themselves
//! live as raw SQL files in the migrations/ directory.

use sqlx::PgPool;

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Check if the loans table exists
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = 'loans'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !exists {
        tracing::error!("Required table 'loans' does not exist");
    }

    Ok(exists)
}
