//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::db::{self, QueryExecutor};
use crate::search::SearchService;
use crate::storefront::{
    CategoryLookup, CategoryService, ContextProvider, ShopService, SimilarProductsGateway,
    SimilarSettings,
};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Query executor (the PostgreSQL pool in production).
    executor: Arc<dyn QueryExecutor>,

    /// Shop context resolution.
    contexts: Arc<dyn ContextProvider>,

    /// Facet generation.
    search: SearchService,

    /// Similar products gateway.
    similar: SimilarProductsGateway,
}

impl AppState {
    /// Create the state with PostgreSQL-backed services.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;
        info!(
            max_connections = config.database_max_connections,
            "Database pool created"
        );

        let executor: Arc<dyn QueryExecutor> = Arc::new(pool.clone());
        let categories: Arc<dyn CategoryLookup> = Arc::new(CategoryService::new(pool.clone()));
        let contexts: Arc<dyn ContextProvider> = Arc::new(ShopService::new(pool));

        Ok(Self::from_parts(
            executor,
            categories,
            contexts,
            SimilarSettings::from_config(config),
        ))
    }

    /// Assemble the state from its collaborators.
    pub fn from_parts(
        executor: Arc<dyn QueryExecutor>,
        categories: Arc<dyn CategoryLookup>,
        contexts: Arc<dyn ContextProvider>,
        similar_settings: SimilarSettings,
    ) -> Self {
        let search = SearchService::with_default_handlers(executor.clone(), categories);
        let similar = SimilarProductsGateway::new(executor.clone(), similar_settings);

        Self {
            inner: Arc::new(AppStateInner {
                executor,
                contexts,
                search,
                similar,
            }),
        }
    }

    pub fn contexts(&self) -> &dyn ContextProvider {
        self.inner.contexts.as_ref()
    }

    pub fn search(&self) -> &SearchService {
        &self.inner.search
    }

    pub fn similar(&self) -> &SimilarProductsGateway {
        &self.inner.similar
    }

    /// Check if the store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.executor.ping().await
    }
}
