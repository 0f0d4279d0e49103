pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "fsnd")]
#[command(about = "Trivia Cafe CLI - database maintenance and development tokens")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending SQL migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Load categories, questions and drinks into empty tables")]
    Seed,

    #[command(about = "Mint an HS256 bearer token for local testing")]
    Token {
        #[arg(long, help = "Token subject")]
        subject: String,

        #[arg(long = "permission", help = "Granted permission, e.g. post:drinks (repeatable)")]
        permissions: Vec<String>,

        #[arg(long, help = "Lifetime in hours (defaults to AUTH_TOKEN_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::database::migrate(output_format).await,
        Commands::Seed => commands::database::seed(output_format).await,
        Commands::Token { subject, permissions, hours } => {
            commands::token::handle(subject, permissions, hours, output_format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_command() {
        let cli = Cli::try_parse_from([
            "fsnd",
            "--json",
            "token",
            "--subject",
            "barista",
            "--permission",
            "get:drinks-detail",
            "--permission",
            "post:drinks",
        ])
        .unwrap();

        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Token { subject, permissions, hours } => {
                assert_eq!(subject, "barista");
                assert_eq!(permissions, vec!["get:drinks-detail", "post:drinks"]);
                assert_eq!(hours, None);
            }
            _ => panic!("expected token command"),
        }
    }
}
