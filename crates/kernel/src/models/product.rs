//! Product identifiers and variant kinds.

use serde::{Deserialize, Serialize};

/// Product identifier.
pub type ProductId = i64;

/// Kind of a product variant, stored as `product_variant.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// The designated primary variant of a product.
    Main,
    /// Any further variant.
    Variant,
}

impl VariantKind {
    /// Column value for this kind.
    pub fn as_i16(self) -> i16 {
        match self {
            VariantKind::Main => 1,
            VariantKind::Variant => 2,
        }
    }
}
