//! Category model: a node of the storefront category tree.
//!
//! Categories carry a hierarchy path (`|parent|grandparent|...|root|`) for
//! descendant filtering and a free-form attribute map that request handlers
//! use to attach computed data, such as facet totals.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Category identifier.
pub type CategoryId = i64;

/// Id of the tree root every category descends from.
pub const ROOT_CATEGORY_ID: CategoryId = 1;

/// `LIKE` pattern matching hierarchy paths that pass through `ancestor`.
pub fn descendant_path_pattern(ancestor: CategoryId) -> String {
    format!("%|{ancestor}|%")
}

/// A storefront category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,

    /// Parent category (NULL for the root).
    pub parent_id: Option<CategoryId>,

    /// Display name.
    pub name: String,

    /// Sort position among siblings.
    pub position: i32,

    /// Whether the category is visible in the storefront.
    pub active: bool,

    /// Ancestor chain, e.g. `|5|3|1|`.
    pub path: Option<String>,

    /// Attributes attached at request time, keyed by name.
    #[sqlx(skip)]
    #[serde(default)]
    pub attributes: BTreeMap<String, Attribute>,
}

/// A bag of named values attached to a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute(serde_json::Map<String, serde_json::Value>);

impl Attribute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous value under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

impl Category {
    /// Attach an attribute under `name`.
    pub fn add_attribute(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.attributes.insert(name.into(), attribute);
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Product total computed by the category facet, if annotated.
    pub fn facet_total(&self) -> Option<i64> {
        self.attribute("facet")?.get("total")?.as_i64()
    }

    /// Fetch active categories by id. Missing or inactive ids are omitted.
    pub async fn find_active_by_ids(pool: &PgPool, ids: &[CategoryId]) -> Result<Vec<Self>> {
        let categories = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, parent_id, name, position, active, path
            FROM category
            WHERE id = ANY($1) AND active = TRUE
            ORDER BY position, id
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .context("failed to fetch categories")?;

        Ok(categories)
    }
}
