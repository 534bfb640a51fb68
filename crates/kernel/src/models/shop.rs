//! Shop model and the per-request shop context.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::category::{CategoryId, ROOT_CATEGORY_ID};

/// Shop identifier.
pub type ShopId = i64;

/// A storefront shop (tenant) with its own category subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    /// Root category of the shop's catalogue.
    pub category_id: Option<CategoryId>,
    pub locale: String,
}

impl Shop {
    /// Find a shop by ID.
    pub async fn find_by_id(pool: &PgPool, id: ShopId) -> Result<Option<Self>> {
        let shop = sqlx::query_as::<_, Self>(
            "SELECT id, name, category_id, locale FROM shop WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch shop")?;

        Ok(shop)
    }
}

/// The caller's shop scope for a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopContext {
    shop: Option<Shop>,
}

impl ShopContext {
    pub fn new(shop: Shop) -> Self {
        Self { shop: Some(shop) }
    }

    /// Root category the caller is scoped to, falling back to the tree root.
    pub fn scoped_category_id(&self) -> CategoryId {
        self.shop
            .as_ref()
            .and_then(|shop| shop.category_id)
            .unwrap_or(ROOT_CATEGORY_ID)
    }
}
