//! Shop context resolution.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Shop, ShopContext, ShopId};

/// Resolves the shop scope of a request.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Build the context for `shop_id`.
    ///
    /// `None` yields the unscoped default context; an unknown shop yields
    /// `Ok(None)`.
    async fn create_context(&self, shop_id: Option<ShopId>) -> Result<Option<ShopContext>>;
}

/// Context provider backed by PostgreSQL.
pub struct ShopService {
    pool: PgPool,
}

impl ShopService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContextProvider for ShopService {
    async fn create_context(&self, shop_id: Option<ShopId>) -> Result<Option<ShopContext>> {
        let Some(shop_id) = shop_id else {
            return Ok(Some(ShopContext::default()));
        };

        Ok(Shop::find_by_id(&self.pool, shop_id)
            .await?
            .map(ShopContext::new))
    }
}
