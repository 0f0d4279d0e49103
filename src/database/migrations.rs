use sqlx::{Executor, PgPool};
use tracing::info;

use crate::database::manager::DatabaseError;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "V1",
        sql: include_str!("../../migrations/V1__trivia.sql"),
    },
    Migration {
        version: "V2",
        sql: include_str!("../../migrations/V2__drinks.sql"),
    },
];

/// Apply pending migrations in order, recording each in `schema_migrations`
pub async fn run(pool: &PgPool) -> Result<usize, DatabaseError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        let already_applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(pool)
                .await?;

        if already_applied {
            continue;
        }

        let mut tx = pool.begin().await?;
        // Plain &str runs over the simple query protocol, which accepts several statements
        (&mut *tx)
            .execute(migration.sql)
            .await
            .map_err(|e| DatabaseError::MigrationError(format!("{}: {}", migration.version, e)))?;
        sqlx::query("INSERT INTO schema_migrations (version) VALUES ($1)")
            .bind(migration.version)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Applied migration {}", migration.version);
        applied += 1;
    }

    Ok(applied)
}
