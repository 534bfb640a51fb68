//! Similar products gateway.
//!
//! Resolves related products' order numbers in two ways:
//! - explicit links from `product_similar` (unlimited)
//! - shared category membership within the caller's shop tree, limited
//!   per source product

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sea_query::{Alias, Cond, Expr, JoinType, Order, Query, SelectStatement};
use tracing::{debug, warn};

use crate::config::Config;
use crate::db::{QueryExecutor, rows};
use crate::models::{CategoryId, ProductId, ShopContext, VariantKind, descendant_path_pattern};
use crate::schema::{
    CATEGORY, PRODUCT, PRODUCT_CATEGORY, PRODUCT_SIMILAR, PRODUCT_VARIANT, col, col_ref,
};

/// Category-based similar products per source product unless configured.
pub const DEFAULT_SIMILAR_LIMIT: usize = 3;

/// Separator used when peers are aggregated into one string.
const NUMBER_SEPARATOR: char = '|';

/// Alias of the ranked peer subquery.
const RANKED: &str = "ranked";

/// How category-based peers are cut down to the limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimilarStrategy {
    /// Rank peers per source with a window function and keep the top `limit`.
    #[default]
    Windowed,
    /// Aggregate peers into a delimited string per source, then split and
    /// truncate after fetching.
    Delimited,
}

impl FromStr for SimilarStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "windowed" => Ok(Self::Windowed),
            "delimited" => Ok(Self::Delimited),
            other => anyhow::bail!(
                "unknown similar strategy '{other}', expected 'windowed' or 'delimited'"
            ),
        }
    }
}

impl fmt::Display for SimilarStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windowed => f.write_str("windowed"),
            Self::Delimited => f.write_str("delimited"),
        }
    }
}

/// Settings for category-based similarity. The limit is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarSettings {
    limit: usize,
    strategy: SimilarStrategy,
}

impl Default for SimilarSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SIMILAR_LIMIT,
            strategy: SimilarStrategy::default(),
        }
    }
}

impl SimilarSettings {
    /// Resolve a configured limit; absent or non-positive values use the default.
    pub fn new(limit: Option<i64>, strategy: SimilarStrategy) -> Self {
        let limit = match limit {
            Some(limit) if limit > 0 => usize::try_from(limit).unwrap_or(DEFAULT_SIMILAR_LIMIT),
            Some(limit) => {
                warn!(
                    limit,
                    default = DEFAULT_SIMILAR_LIMIT,
                    "ignoring non-positive similar limit"
                );
                DEFAULT_SIMILAR_LIMIT
            }
            None => DEFAULT_SIMILAR_LIMIT,
        };
        Self { limit, strategy }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.similar_limit, config.similar_strategy)
    }

    /// Category-based peers kept per source product.
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn strategy(&self) -> SimilarStrategy {
        self.strategy
    }
}

/// Deduplicate ids, keeping the first occurrence of each.
pub fn unique_ids(ids: &[ProductId]) -> Vec<ProductId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Gateway for similar product lookups.
pub struct SimilarProductsGateway {
    executor: Arc<dyn QueryExecutor>,
    settings: SimilarSettings,
}

impl SimilarProductsGateway {
    pub fn new(executor: Arc<dyn QueryExecutor>, settings: SimilarSettings) -> Self {
        Self { executor, settings }
    }

    // -------------------------------------------------------------------------
    // Explicit links
    // -------------------------------------------------------------------------

    /// Order numbers linked to a single product; empty when it has none.
    pub async fn get(&self, id: ProductId, context: &ShopContext) -> Result<Vec<String>> {
        let mut related = self.get_list(&[id], context).await?;
        Ok(related.remove(&id).unwrap_or_default())
    }

    /// Order numbers linked to each product. Products without links are absent.
    pub async fn get_list(
        &self,
        ids: &[ProductId],
        _context: &ShopContext,
    ) -> Result<HashMap<ProductId, Vec<String>>> {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = Self::linked_query(&ids);
        let rows = self
            .executor
            .fetch_all(&query)
            .await
            .context("failed to fetch linked similar products")?;

        let related: HashMap<ProductId, Vec<String>> = rows::group_by(&rows, "id", "number")?;
        debug!(
            requested = ids.len(),
            found = related.len(),
            "linked similar products fetched"
        );
        Ok(related)
    }

    /// Query for explicitly linked products' main variant order numbers.
    pub fn linked_query(ids: &[ProductId]) -> SelectStatement {
        let mut query = Query::select();
        query
            .expr_as(col(PRODUCT, "id"), Alias::new("id"))
            .expr_as(col("similar_variant", "order_number"), Alias::new("number"))
            .from_as(Alias::new(PRODUCT_SIMILAR), Alias::new("similar"))
            .join_as(
                JoinType::InnerJoin,
                Alias::new(PRODUCT),
                Alias::new(PRODUCT),
                col(PRODUCT, "id").equals(col_ref("similar", "product_id")),
            )
            .join_as(
                JoinType::InnerJoin,
                Alias::new(PRODUCT),
                Alias::new("similar_product"),
                col("similar_product", "id").equals(col_ref("similar", "related_product_id")),
            )
            .join_as(
                JoinType::InnerJoin,
                Alias::new(PRODUCT_VARIANT),
                Alias::new("similar_variant"),
                col("similar_variant", "id").equals(col_ref("similar_product", "main_variant_id")),
            )
            .and_where(col(PRODUCT, "id").is_in(ids.iter().copied()))
            .and_where(col("similar", "related_product_id").ne(col("similar", "product_id")));
        query
    }

    // -------------------------------------------------------------------------
    // Shared categories
    // -------------------------------------------------------------------------

    /// Order numbers sharing a category with a single product; empty when none.
    pub async fn get_by_category(
        &self,
        id: ProductId,
        context: &ShopContext,
    ) -> Result<Vec<String>> {
        let mut related = self.get_list_by_category(&[id], context).await?;
        Ok(related.remove(&id).unwrap_or_default())
    }

    /// Order numbers of main variants sharing a category with each product,
    /// within the shop's category tree, at most `limit` per product.
    pub async fn get_list_by_category(
        &self,
        ids: &[ProductId],
        context: &ShopContext,
    ) -> Result<HashMap<ProductId, Vec<String>>> {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let root = context.scoped_category_id();
        let limit = self.settings.limit();

        let related = match self.settings.strategy() {
            SimilarStrategy::Windowed => {
                let query = Self::ranked_category_query(&ids, root, limit);
                let rows = self
                    .executor
                    .fetch_all(&query)
                    .await
                    .context("failed to fetch similar products by category")?;
                let mut grouped: HashMap<ProductId, Vec<String>> =
                    rows::group_by(&rows, "id", "number")?;
                for numbers in grouped.values_mut() {
                    numbers.truncate(limit);
                }
                grouped
            }
            SimilarStrategy::Delimited => {
                let query = Self::aggregated_category_query(&ids, root);
                let rows = self
                    .executor
                    .fetch_all(&query)
                    .await
                    .context("failed to fetch similar products by category")?;
                let mut grouped = HashMap::with_capacity(rows.len());
                for row in &rows {
                    let id: ProductId = rows::column(row, "id")?;
                    let similar: Option<String> = rows::column(row, "similar")?;
                    if let Some(similar) = similar {
                        grouped.insert(id, split_numbers(&similar, limit));
                    }
                }
                grouped
            }
        };

        debug!(
            requested = ids.len(),
            found = related.len(),
            root,
            limit,
            strategy = %self.settings.strategy(),
            "similar products by category fetched"
        );
        Ok(related)
    }

    /// Peers of `ids`: other products' main variants sharing a category that
    /// lies under `root`. No projection.
    fn category_peers(ids: &[ProductId], root: CategoryId) -> SelectStatement {
        let mut query = Query::select();
        query
            .from_as(Alias::new(PRODUCT_CATEGORY), Alias::new("main"))
            .join_as(
                JoinType::InnerJoin,
                Alias::new(PRODUCT_CATEGORY),
                Alias::new("sub"),
                Cond::all()
                    .add(col("sub", "category_id").equals(col_ref("main", "category_id")))
                    .add(col("sub", "product_id").ne(col("main", "product_id"))),
            )
            .join_as(
                JoinType::InnerJoin,
                Alias::new(PRODUCT_VARIANT),
                Alias::new("sub_variant"),
                Cond::all()
                    .add(col("sub_variant", "product_id").equals(col_ref("sub", "product_id")))
                    .add(col("sub_variant", "kind").eq(VariantKind::Main.as_i16())),
            )
            .join_as(
                JoinType::InnerJoin,
                Alias::new(CATEGORY),
                Alias::new(CATEGORY),
                Cond::all()
                    .add(col(CATEGORY, "id").equals(col_ref("sub", "category_id")))
                    .add(col(CATEGORY, "id").equals(col_ref("main", "category_id"))),
            )
            .and_where(col("main", "product_id").is_in(ids.iter().copied()))
            .and_where(col(CATEGORY, "path").like(descendant_path_pattern(root)));
        query
    }

    /// Peers ranked per source product, keeping the first `limit`.
    pub fn ranked_category_query(
        ids: &[ProductId],
        root: CategoryId,
        limit: usize,
    ) -> SelectStatement {
        let mut ranked = Self::category_peers(ids, root);
        ranked
            .expr_as(col("main", "product_id"), Alias::new("id"))
            .expr_as(col("sub_variant", "order_number"), Alias::new("number"))
            .expr_as(
                Expr::cust(
                    "ROW_NUMBER() OVER (PARTITION BY \"main\".\"product_id\" \
                     ORDER BY \"sub\".\"product_id\", \"sub\".\"category_id\")",
                ),
                Alias::new("peer_rank"),
            );

        let mut query = Query::select();
        query
            .column(col_ref(RANKED, "id"))
            .column(col_ref(RANKED, "number"))
            .from_subquery(ranked, Alias::new(RANKED))
            .and_where(col(RANKED, "peer_rank").lte(i64::try_from(limit).unwrap_or(i64::MAX)))
            .order_by(col_ref(RANKED, "id"), Order::Asc)
            .order_by(col_ref(RANKED, "peer_rank"), Order::Asc);
        query
    }

    /// Peers aggregated into one `|`-delimited string per source product.
    pub fn aggregated_category_query(ids: &[ProductId], root: CategoryId) -> SelectStatement {
        let mut query = Self::category_peers(ids, root);
        query
            .expr_as(col("main", "product_id"), Alias::new("id"))
            .expr_as(
                Expr::cust(
                    "STRING_AGG(\"sub_variant\".\"order_number\", '|' \
                     ORDER BY \"sub\".\"product_id\", \"sub\".\"category_id\")",
                ),
                Alias::new("similar"),
            )
            .group_by_col(col_ref("main", "product_id"));
        query
    }
}

/// Split an aggregated peer string and keep the first `limit` numbers.
///
/// Empty order numbers are kept, as the windowed strategy returns them too.
fn split_numbers(aggregated: &str, limit: usize) -> Vec<String> {
    aggregated
        .split(NUMBER_SEPARATOR)
        .take(limit)
        .map(str::to_string)
        .collect()
}
