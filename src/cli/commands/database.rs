use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{migrations, seed, DatabaseManager};

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let pool = DatabaseManager::connect(&config.database).await?;

    let applied = migrations::run(&pool).await?;

    output_success(
        &output_format,
        &format!("Applied {} migration(s)", applied),
        Some(json!({ "applied": applied })),
    )
}

pub async fn seed(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let pool = DatabaseManager::connect(&config.database).await?;

    seed::seed_postgres(&pool).await?;

    output_success(
        &output_format,
        "Seed data loaded",
        Some(json!({
            "categories": seed::CATEGORIES.len(),
            "questions": seed::QUESTIONS.len(),
        })),
    )
}
