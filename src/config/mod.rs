use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Unset means the seeded in-memory store is used instead of PostgreSQL
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenAlgorithm {
    HS256,
    RS256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub algorithm: TokenAlgorithm,
    pub jwt_secret: String,
    pub public_key_pem: Option<String>,
    pub audience: Option<String>,
    pub issuer: Option<String>,
    pub token_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Secret used in development when AUTH_JWT_SECRET is not set
const DEVELOPMENT_SECRET: &str = "development-secret-change-me";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?;

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("SERVER_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_ALGORITHM") {
            self.auth.algorithm = match v.to_ascii_uppercase().as_str() {
                "HS256" => TokenAlgorithm::HS256,
                "RS256" => TokenAlgorithm::RS256,
                _ => return Err(ConfigError::Invalid { name: "AUTH_ALGORITHM", value: v }),
            };
        }
        if let Ok(v) = env::var("AUTH_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Ok(path) = env::var("AUTH_PUBLIC_KEY_PATH") {
            let pem = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
            self.auth.public_key_pem = Some(pem);
        }
        if let Ok(v) = env::var("AUTH_AUDIENCE") {
            self.auth.audience = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("AUTH_ISSUER") {
            self.auth.issuer = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("AUTH_TOKEN_EXPIRY_HOURS") {
            self.auth.token_expiry_hours = v.parse().unwrap_or(self.auth.token_expiry_hours);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        Ok(self)
    }

    /// Reject configurations that would leave protected routes without a verification key
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.auth.algorithm {
            TokenAlgorithm::HS256 => {
                if self.auth.jwt_secret.is_empty() {
                    return Err(ConfigError::Missing("AUTH_JWT_SECRET"));
                }
                if self.environment == Environment::Production
                    && self.auth.jwt_secret == DEVELOPMENT_SECRET
                {
                    return Err(ConfigError::Invalid {
                        name: "AUTH_JWT_SECRET",
                        value: "<development secret>".to_string(),
                    });
                }
            }
            TokenAlgorithm::RS256 => {
                if self.auth.public_key_pem.is_none() {
                    return Err(ConfigError::Missing("AUTH_PUBLIC_KEY_PATH"));
                }
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
                run_migrations: true,
            },
            auth: AuthConfig {
                algorithm: TokenAlgorithm::HS256,
                jwt_secret: DEVELOPMENT_SECRET.to_string(),
                public_key_pem: None,
                audience: None,
                issuer: None,
                token_expiry_hours: 24,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 10,
                run_migrations: true,
            },
            auth: AuthConfig {
                algorithm: TokenAlgorithm::HS256,
                jwt_secret: String::new(),
                public_key_pem: None,
                audience: None,
                issuer: None,
                token_expiry_hours: 8,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:8100".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 5,
                run_migrations: false,
            },
            auth: AuthConfig {
                algorithm: TokenAlgorithm::RS256,
                jwt_secret: String::new(),
                public_key_pem: None,
                audience: None,
                issuer: None,
                token_expiry_hours: 1,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: Vec::new(),
            },
        }
    }
}

#[macro_export]
macro_rules! is_development {
    ($config:expr) => {
        matches!($config.environment, $crate::config::Environment::Development)
    };
}
