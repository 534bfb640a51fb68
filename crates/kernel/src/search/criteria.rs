//! Search criteria types.

use serde::{Deserialize, Serialize};

use super::facet::Facet;
use crate::models::{CategoryId, ProductId};

/// What to search for, how to order it, and which facets to compute.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub conditions: Vec<Condition>,
    pub sortings: Vec<Sorting>,
    pub facets: Vec<Facet>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_sorting(mut self, sorting: Sorting) -> Self {
        self.sortings.push(sorting);
        self
    }

    pub fn with_facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }
}

/// A restriction on the product set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Products assigned to any of the categories (or their descendants).
    Category { category_ids: Vec<CategoryId> },
    /// Products with one of the given ids.
    ProductIds { ids: Vec<ProductId> },
    /// Only active products.
    Active,
}

/// Ordering of the product set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "direction", rename_all = "snake_case")]
pub enum Sorting {
    Name(SortDirection),
    ProductId(SortDirection),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}
