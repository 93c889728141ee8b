use crate::error::{AppError, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub paging: PagingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Defaults applied to `page`/`size` on search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 2000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let paging = PagingConfig {
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", "20")?,
            max_page_size: parse_var("MAX_PAGE_SIZE", "2000")?,
        };

        if paging.default_page_size == 0 || paging.default_page_size > paging.max_page_size {
            return Err(AppError::ConfigError(
                "DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE".to_string(),
            ));
        }

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", "8080")?,
                max_body_size: parse_var("MAX_BODY_SIZE", "1048576")?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: parse_var("DB_MAX_CONNECTIONS", "10")?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|origins| split_origins(&origins))
                    .unwrap_or_default(),
            },
            paging,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// One-line description of the effective settings, logged at startup.
    pub fn summary(&self) -> String {
        format!(
            "pool {} connections, page size {} (max {}), body limit {} bytes, {} CORS origins",
            self.database.max_connections,
            self.paging.default_page_size,
            self.paging.max_page_size,
            self.server.max_body_size,
            self.cors.allowed_origins.len(),
        )
    }
}

fn parse_var<T: FromStr>(key: &str, default: &str) -> Result<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid {} value", key)))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
