//! Product search: criteria, query composition, and facet generation.
//!
//! This module provides:
//! - Criteria: conditions, sortings, and requested facets
//! - ProductQuery: immutable query-in-progress built from criteria
//! - FacetHandler: per-kind facet generation (category, manufacturer)
//! - SearchService: dispatches requested facets to their handlers

mod category_facet;
mod condition;
pub mod criteria;
mod facet;
mod manufacturer_facet;
mod query;
mod service;

pub use category_facet::CategoryFacetHandler;
pub use condition::{CATEGORY_PARAMETER, build_query};
pub use criteria::{Condition, Criteria, SortDirection, Sorting};
pub use facet::{CategoryFacet, Facet, FacetHandler, ManufacturerCount, ManufacturerFacet};
pub use manufacturer_facet::ManufacturerFacetHandler;
pub use query::ProductQuery;
pub use service::SearchService;
