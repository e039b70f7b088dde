//! Application configuration loaded from environment variables.

use std::env;

use blog_core::{PostField, PostRules};
use blog_infra::database::DatabaseConfig;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub post_rules: PostRules,
    pub cors: CorsOrigins,
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (`Access-Control-Allow-Origin: *`).
    Any,
    /// Only the listed origins, e.g. `https://blog.example.com`.
    List(Vec<String>),
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let database = Self::database_url(&var).map(|url| DatabaseConfig {
            url,
            max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: var("DB_MIN_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        });

        let post_rules = var("POST_REQUIRED_FIELDS")
            .map(|list| Self::parse_required_fields(&list))
            .unwrap_or_default();

        let cors = var("CORS_ALLOWED_ORIGINS")
            .map(|list| Self::parse_cors_origins(&list))
            .unwrap_or(CorsOrigins::Any);

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(3000),
            database,
            post_rules,
            cors,
        }
    }

    /// Resolve the connection string.
    ///
    /// `DATABASE_URL` wins; otherwise it is assembled from `DB_HOST`,
    /// `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`. `DB_SSLMODE`
    /// (default `prefer`) is applied to either form unless the URL already
    /// names an `sslmode`.
    fn database_url(var: &impl Fn(&str) -> Option<String>) -> Option<String> {
        let mode = var("DB_SSLMODE").unwrap_or_else(|| "prefer".to_string());

        if let Some(url) = var("DATABASE_URL") {
            if url.contains("sslmode=") {
                return Some(url);
            }
            let sep = if url.contains('?') { '&' } else { '?' };
            return Some(format!("{url}{sep}sslmode={mode}"));
        }

        let host = var("DB_HOST")?;
        let name = var("DB_NAME")?;
        let port = var("DB_PORT").unwrap_or_else(|| "5432".to_string());
        let user = var("DB_USER").unwrap_or_else(|| "postgres".to_string());
        let credentials = match var("DB_PASSWORD") {
            Some(password) => format!("{}:{}", encode(&user), encode(&password)),
            None => encode(&user),
        };

        Some(format!(
            "postgres://{credentials}@{host}:{port}/{name}?sslmode={mode}"
        ))
    }

    /// Parse a comma separated list of required post fields.
    /// Example: POST_REQUIRED_FIELDS=title,content,cover
    fn parse_required_fields(list: &str) -> PostRules {
        let fields = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|name| match name.parse::<PostField>() {
                Ok(field) => Some(field),
                Err(e) => {
                    tracing::warn!("Ignoring POST_REQUIRED_FIELDS entry: {}", e);
                    None
                }
            });

        PostRules::new(fields)
    }

    /// Parse `CORS_ALLOWED_ORIGINS`: `*` or a comma separated origin list.
    /// Example: CORS_ALLOWED_ORIGINS=https://blog.example.com,http://localhost:5173
    fn parse_cors_origins(list: &str) -> CorsOrigins {
        let origins: Vec<String> = list
            .split(',')
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, NON_ALPHANUMERIC).to_string()
}
