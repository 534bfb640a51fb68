//! Category facet: how many products are assigned to each child category.
//!
//! The parent categories come from the `category` parameter bound by a
//! category condition. Without one, children of the tree root are counted.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_query::{Alias, Cond, Expr, SelectStatement};
use tracing::debug;

use super::condition::{CATEGORY_PARAMETER, PRODUCT_CATEGORY_ALIAS};
use super::criteria::Criteria;
use super::facet::{Facet, FacetHandler};
use super::query::ProductQuery;
use crate::db::{QueryExecutor, rows};
use crate::models::{Attribute, Category, CategoryId, ROOT_CATEGORY_ID, ShopContext};
use crate::schema::{CATEGORY, PRODUCT, PRODUCT_CATEGORY_RO, col, col_ref};
use crate::storefront::CategoryLookup;

/// Generates `Facet::Category`.
pub struct CategoryFacetHandler {
    executor: Arc<dyn QueryExecutor>,
    categories: Arc<dyn CategoryLookup>,
}

impl CategoryFacetHandler {
    pub fn new(executor: Arc<dyn QueryExecutor>, categories: Arc<dyn CategoryLookup>) -> Self {
        Self {
            executor,
            categories,
        }
    }

    /// Build the per-category count query from the base query.
    ///
    /// Inherited category joins, ordering, and grouping are discarded; other
    /// conditions still restrict the counted products.
    pub fn build_query(query: &ProductQuery) -> SelectStatement {
        let parent_ids = query
            .parameter(CATEGORY_PARAMETER)
            .filter(|ids| !ids.is_empty())
            .map(<[CategoryId]>::to_vec)
            .unwrap_or_else(|| vec![ROOT_CATEGORY_ID]);

        let shaped = query
            .clone()
            .without_table_include(CATEGORY)
            .without_table_include(PRODUCT_CATEGORY_RO)
            .without_order_by()
            .without_group_by()
            .with_join(
                PRODUCT_CATEGORY_RO,
                PRODUCT_CATEGORY_ALIAS,
                col(PRODUCT_CATEGORY_ALIAS, "product_id").equals(col_ref(PRODUCT, "id")),
            )
            .with_join(
                CATEGORY,
                CATEGORY,
                Cond::all()
                    .add(col(CATEGORY, "id").equals(col_ref(PRODUCT_CATEGORY_ALIAS, "category_id")))
                    .add(col(CATEGORY, "parent_id").is_in(parent_ids))
                    .add(col(CATEGORY, "active").eq(true)),
            )
            .with_group_by(PRODUCT_CATEGORY_ALIAS, "category_id");

        let mut select = shaped.select();
        select
            .expr_as(col(PRODUCT_CATEGORY_ALIAS, "category_id"), Alias::new("id"))
            .expr_as(
                Expr::cust("COUNT(DISTINCT \"product\".\"id\")"),
                Alias::new("total"),
            );
        select
    }

    /// Hydrate counted category ids and attach their totals.
    ///
    /// Ids the lookup no longer resolves are skipped.
    async fn annotate(
        &self,
        totals: Vec<(CategoryId, i64)>,
        context: &ShopContext,
    ) -> Result<Vec<Category>> {
        if totals.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<CategoryId> = totals.iter().map(|(id, _)| *id).collect();
        let mut resolved = self.categories.get_list(&ids, context).await?;

        let mut annotated = Vec::with_capacity(totals.len());
        for (id, total) in totals {
            let Some(mut category) = resolved.remove(&id) else {
                debug!(category_id = id, "category not resolvable, skipping facet entry");
                continue;
            };
            let mut attribute = Attribute::new();
            attribute.set("total", total);
            category.add_attribute("facet", attribute);
            annotated.push(category);
        }

        annotated.sort_by_key(|c| (c.position, c.id));
        Ok(annotated)
    }
}

#[async_trait]
impl FacetHandler for CategoryFacetHandler {
    fn supports_facet(&self, facet: &Facet) -> bool {
        matches!(facet, Facet::Category(_))
    }

    async fn generate_facet(
        &self,
        facet: Facet,
        query: &ProductQuery,
        _criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Facet> {
        let kind = facet.kind();
        let Facet::Category(mut facet) = facet else {
            anyhow::bail!("category facet handler cannot generate '{kind}' facets");
        };

        let select = Self::build_query(query);
        let rows = self
            .executor
            .fetch_all(&select)
            .await
            .context("failed to execute category facet query")?;
        let totals: Vec<(CategoryId, i64)> = rows::key_pairs(&rows, "id", "total")?;
        debug!(categories = totals.len(), "category facet totals fetched");

        facet.categories = self.annotate(totals, context).await?;
        Ok(Facet::Category(facet))
    }
}
