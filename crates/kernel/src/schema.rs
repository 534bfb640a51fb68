//! Table names of the relational schema and helpers for addressing columns.

use sea_query::{Alias, Expr};

/// Products.
pub const PRODUCT: &str = "product";
/// Product variants (SKUs) with order numbers.
pub const PRODUCT_VARIANT: &str = "product_variant";
/// Curated similarity links between products.
pub const PRODUCT_SIMILAR: &str = "product_similar";
/// Direct product → category assignments.
pub const PRODUCT_CATEGORY: &str = "product_category";
/// Denormalized product → category assignments including every ancestor.
pub const PRODUCT_CATEGORY_RO: &str = "product_category_ro";
/// Category tree.
pub const CATEGORY: &str = "category";
/// Product manufacturers.
pub const MANUFACTURER: &str = "manufacturer";

/// Column reference `alias.column`.
pub fn col(alias: &str, column: &str) -> Expr {
    Expr::col((Alias::new(alias), Alias::new(column)))
}

/// Column pair for GROUP BY / ORDER BY / equality joins.
pub fn col_ref(alias: &str, column: &str) -> (Alias, Alias) {
    (Alias::new(alias), Alias::new(column))
}
