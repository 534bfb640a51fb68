//! Database models.

pub mod category;
pub mod product;
pub mod shop;

pub use category::{
    Attribute, Category, CategoryId, ROOT_CATEGORY_ID, descendant_path_pattern,
};
pub use product::{ProductId, VariantKind};
pub use shop::{Shop, ShopContext, ShopId};
