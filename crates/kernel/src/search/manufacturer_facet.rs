//! Manufacturer facet: how many products each manufacturer supplies.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_query::{Alias, Expr, Order, SelectStatement};

use super::criteria::Criteria;
use super::facet::{Facet, FacetHandler, ManufacturerCount};
use super::query::ProductQuery;
use crate::db::{QueryExecutor, rows};
use crate::models::ShopContext;
use crate::schema::{MANUFACTURER, PRODUCT, col, col_ref};

/// Generates `Facet::Manufacturer`.
pub struct ManufacturerFacetHandler {
    executor: Arc<dyn QueryExecutor>,
}

impl ManufacturerFacetHandler {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    pub fn build_query(query: &ProductQuery) -> SelectStatement {
        let shaped = query
            .clone()
            .without_table_include(MANUFACTURER)
            .without_order_by()
            .without_group_by()
            .with_join(
                MANUFACTURER,
                MANUFACTURER,
                col(MANUFACTURER, "id").equals(col_ref(PRODUCT, "manufacturer_id")),
            )
            .with_group_by(MANUFACTURER, "id")
            .with_group_by(MANUFACTURER, "name")
            .with_order_by(col(MANUFACTURER, "name"), Order::Asc);

        let mut select = shaped.select();
        select
            .expr_as(col(MANUFACTURER, "id"), Alias::new("id"))
            .expr_as(col(MANUFACTURER, "name"), Alias::new("name"))
            .expr_as(
                Expr::cust("COUNT(DISTINCT \"product\".\"id\")"),
                Alias::new("total"),
            );
        select
    }
}

#[async_trait]
impl FacetHandler for ManufacturerFacetHandler {
    fn supports_facet(&self, facet: &Facet) -> bool {
        matches!(facet, Facet::Manufacturer(_))
    }

    async fn generate_facet(
        &self,
        facet: Facet,
        query: &ProductQuery,
        _criteria: &Criteria,
        _context: &ShopContext,
    ) -> Result<Facet> {
        let kind = facet.kind();
        let Facet::Manufacturer(mut facet) = facet else {
            anyhow::bail!("manufacturer facet handler cannot generate '{kind}' facets");
        };

        let select = Self::build_query(query);
        let rows = self
            .executor
            .fetch_all(&select)
            .await
            .context("failed to execute manufacturer facet query")?;

        facet.manufacturers = rows
            .iter()
            .map(|row| {
                Ok(ManufacturerCount {
                    id: rows::column(row, "id")?,
                    name: rows::column(row, "name")?,
                    total: rows::column(row, "total")?,
                })
            })
            .collect::<Result<_>>()?;
        Ok(Facet::Manufacturer(facet))
    }
}
