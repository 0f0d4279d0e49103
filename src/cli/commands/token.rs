use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(
    subject: String,
    permissions: Vec<String>,
    hours: Option<u64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(hours) = hours {
        config.auth.token_expiry_hours = hours;
    }

    let claims = Claims::new(subject, permissions, &config.auth)?;
    let token = generate_jwt(&claims, &config.auth)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token generated",
            Some(json!({
                "token": token,
                "subject": claims.sub,
                "permissions": claims.permissions,
                "expires_at": claims.exp,
            })),
        ),
        // Bare token so it can be captured with $(fsnd token ...)
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
