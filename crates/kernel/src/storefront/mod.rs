//! Storefront services: category lookup, shop context, and similar products.

mod category_service;
mod context_service;
mod similar;

pub use category_service::{CategoryLookup, CategoryService};
pub use context_service::{ContextProvider, ShopService};
pub use similar::{
    DEFAULT_SIMILAR_LIMIT, SimilarProductsGateway, SimilarSettings, SimilarStrategy, unique_ids,
};
