//! Facet kinds and the handler trait that generates them.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::criteria::Criteria;
use super::query::ProductQuery;
use crate::models::{Category, ShopContext};

/// A requested (or generated) aggregation over the product set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Facet {
    /// Product counts per child category.
    Category(CategoryFacet),
    /// Product counts per manufacturer.
    Manufacturer(ManufacturerFacet),
}

impl Facet {
    /// Machine name of the facet kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Facet::Category(_) => "category",
            Facet::Manufacturer(_) => "manufacturer",
        }
    }

    /// Empty facet for a machine name, as used in request parameters.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "category" => Some(Facet::Category(CategoryFacet::default())),
            "manufacturer" => Some(Facet::Manufacturer(ManufacturerFacet::default())),
            _ => None,
        }
    }
}

/// Child categories annotated with product totals (attribute `facet`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFacet {
    pub categories: Vec<Category>,
}

/// Manufacturers with product totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerFacet {
    pub manufacturers: Vec<ManufacturerCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerCount {
    pub id: i64,
    pub name: String,
    pub total: i64,
}

/// Generates one kind of facet from the base query of a search.
#[async_trait]
pub trait FacetHandler: Send + Sync {
    /// Whether this handler generates `facet`.
    fn supports_facet(&self, facet: &Facet) -> bool;

    /// Compute the facet. `query` is the base query built from `criteria`;
    /// handlers derive their own shape from it and never change it.
    async fn generate_facet(
        &self,
        facet: Facet,
        query: &ProductQuery,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Facet>;
}
