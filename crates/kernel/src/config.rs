//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::storefront::SimilarStrategy;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Maximum number of category-based similar products per source product.
    ///
    /// Non-positive values fall back to the gateway default.
    pub similar_limit: Option<i64>,

    /// How category-based similarity is truncated per source product
    /// (default: windowed).
    pub similar_strategy: SimilarStrategy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let similar_limit = var("SIMILAR_LIMIT")
            .map(|v| v.trim().parse::<i64>())
            .transpose()
            .context("SIMILAR_LIMIT must be an integer")?;

        let similar_strategy = var("SIMILAR_STRATEGY")
            .map(|v| v.parse::<SimilarStrategy>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            similar_limit,
            similar_strategy,
        })
    }
}
