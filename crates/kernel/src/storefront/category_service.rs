//! Category lookup for hydrating category ids into full records.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Category, CategoryId, ShopContext};

/// Batch category lookup.
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    /// Resolve `ids` into categories visible in `context`.
    ///
    /// Ids without a visible category are absent from the map.
    async fn get_list(
        &self,
        ids: &[CategoryId],
        context: &ShopContext,
    ) -> Result<HashMap<CategoryId, Category>>;
}

/// Category lookup backed by PostgreSQL.
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryLookup for CategoryService {
    async fn get_list(
        &self,
        ids: &[CategoryId],
        _context: &ShopContext,
    ) -> Result<HashMap<CategoryId, Category>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let categories = Category::find_active_by_ids(&self.pool, ids).await?;
        tracing::debug!(
            requested = ids.len(),
            resolved = categories.len(),
            "resolved categories"
        );

        Ok(categories.into_iter().map(|c| (c.id, c)).collect())
    }
}
