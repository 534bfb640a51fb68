//! Search service dispatching requested facets to their handlers.

use std::sync::Arc;

use anyhow::{Context, Result};

use super::category_facet::CategoryFacetHandler;
use super::condition::build_query;
use super::criteria::Criteria;
use super::facet::{Facet, FacetHandler};
use super::manufacturer_facet::ManufacturerFacetHandler;
use crate::db::QueryExecutor;
use crate::models::ShopContext;
use crate::storefront::CategoryLookup;

/// Service for generating search facets.
pub struct SearchService {
    handlers: Vec<Arc<dyn FacetHandler>>,
}

impl SearchService {
    /// Create a service with an explicit set of handlers.
    pub fn new(handlers: Vec<Arc<dyn FacetHandler>>) -> Self {
        Self { handlers }
    }

    /// Create a service with the built-in category and manufacturer handlers.
    pub fn with_default_handlers(
        executor: Arc<dyn QueryExecutor>,
        categories: Arc<dyn CategoryLookup>,
    ) -> Self {
        Self::new(vec![
            Arc::new(CategoryFacetHandler::new(executor.clone(), categories)),
            Arc::new(ManufacturerFacetHandler::new(executor)),
        ])
    }

    /// First registered handler that supports `facet`.
    pub fn handler_for(&self, facet: &Facet) -> Option<&Arc<dyn FacetHandler>> {
        self.handlers.iter().find(|h| h.supports_facet(facet))
    }

    /// Generate every facet requested by `criteria`, in request order.
    pub async fn facets(&self, criteria: &Criteria, context: &ShopContext) -> Result<Vec<Facet>> {
        let query = build_query(criteria);
        let mut facets = Vec::with_capacity(criteria.facets.len());

        for facet in &criteria.facets {
            let handler = self
                .handler_for(facet)
                .with_context(|| format!("no facet handler registered for '{}'", facet.kind()))?;
            let generated = handler
                .generate_facet(facet.clone(), &query, criteria, context)
                .await
                .with_context(|| format!("failed to generate '{}' facet", facet.kind()))?;
            facets.push(generated);
        }

        Ok(facets)
    }
}
