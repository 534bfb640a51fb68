#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Provides in-memory collaborators for the kernel's seams: a query executor
//! that replays canned rows and records the SQL it was given, a static
//! category lookup, and a static shop context provider. The services under
//! test are the REAL kernel services.
//!
//! [`TestStore`] seeds the catalogue fixture into a fresh PostgreSQL schema
//! for tests that run the generated SQL against a real database.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use sea_query::{PostgresQueryBuilder, SelectStatement};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use storefront_kernel::{AppState, Config};
use storefront_kernel::db::{JsonRow, QueryExecutor};
use storefront_kernel::models::{
    Category, CategoryId, ROOT_CATEGORY_ID, Shop, ShopContext, ShopId,
};
use storefront_kernel::storefront::{CategoryLookup, ContextProvider, SimilarSettings};

/// Build a row from a JSON object literal.
pub fn row(value: serde_json::Value) -> JsonRow {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("row fixture must be a JSON object, got {other}"),
    }
}

/// Executor replaying queued result sets in call order.
///
/// Once the queue is drained every further call returns no rows.
#[derive(Default)]
pub struct RecordingExecutor {
    responses: Mutex<VecDeque<Vec<JsonRow>>>,
    queries: Mutex<Vec<String>>,
    healthy: bool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    pub fn unhealthy() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next unanswered call.
    pub fn respond(self, rows: Vec<JsonRow>) -> Self {
        self.responses.lock().push_back(rows);
        self
    }

    /// SQL of every executed query, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn fetch_all(&self, query: &SelectStatement) -> Result<Vec<JsonRow>> {
        self.queries.lock().push(query.to_string(PostgresQueryBuilder));
        Ok(self.responses.lock().pop_front().unwrap_or_default())
    }

    async fn ping(&self) -> bool {
        self.healthy
    }
}

/// Executor failing every query, as a lost connection would.
pub struct FailingExecutor;

#[async_trait]
impl QueryExecutor for FailingExecutor {
    async fn fetch_all(&self, _query: &SelectStatement) -> Result<Vec<JsonRow>> {
        anyhow::bail!("connection reset by peer")
    }

    async fn ping(&self) -> bool {
        false
    }
}

/// Category lookup over a fixed set, honouring the active flag.
#[derive(Default)]
pub struct StaticCategories {
    categories: HashMap<CategoryId, Category>,
    calls: Mutex<Vec<Vec<CategoryId>>>,
}

impl StaticCategories {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Id lists of every lookup, in order.
    pub fn calls(&self) -> Vec<Vec<CategoryId>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CategoryLookup for StaticCategories {
    async fn get_list(
        &self,
        ids: &[CategoryId],
        _context: &ShopContext,
    ) -> Result<HashMap<CategoryId, Category>> {
        self.calls.lock().push(ids.to_vec());
        Ok(ids
            .iter()
            .filter_map(|id| self.categories.get(id))
            .filter(|c| c.active)
            .map(|c| (c.id, c.clone()))
            .collect())
    }
}

/// Context provider over a fixed set of shops.
#[derive(Default)]
pub struct StaticShops {
    shops: HashMap<ShopId, Shop>,
}

impl StaticShops {
    pub fn new(shops: Vec<Shop>) -> Self {
        Self {
            shops: shops.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

#[async_trait]
impl ContextProvider for StaticShops {
    async fn create_context(&self, shop_id: Option<ShopId>) -> Result<Option<ShopContext>> {
        match shop_id {
            None => Ok(Some(ShopContext::default())),
            Some(id) => Ok(self.shops.get(&id).cloned().map(ShopContext::new)),
        }
    }
}

/// An active category directly below `parent_id`.
pub fn category(id: CategoryId, parent_id: CategoryId, position: i32) -> Category {
    Category {
        id,
        parent_id: Some(parent_id),
        name: format!("Category {id}"),
        position,
        active: true,
        path: Some(format!("|{parent_id}|{ROOT_CATEGORY_ID}|")),
        attributes: Default::default(),
    }
}

/// A shop rooted at `category_id`.
pub fn shop(id: ShopId, category_id: Option<CategoryId>) -> Shop {
    Shop {
        id,
        name: format!("Shop {id}"),
        category_id,
        locale: "en_GB".to_string(),
    }
}

/// App state over in-memory collaborators.
pub fn test_state(
    executor: Arc<dyn QueryExecutor>,
    categories: Arc<dyn CategoryLookup>,
    shops: Arc<dyn ContextProvider>,
    settings: SimilarSettings,
) -> AppState {
    AppState::from_parts(executor, categories, shops, settings)
}

/// Catalogue schema and seed rows.
const CATALOGUE_SQL: &str = include_str!("../fixtures/catalogue.sql");

static NEXT_SCHEMA: AtomicUsize = AtomicUsize::new(0);

/// The catalogue fixture seeded into its own PostgreSQL schema.
///
/// Every pool connection has its `search_path` set to that schema, so tests
/// can run in parallel against one database.
pub struct TestStore {
    pub pool: PgPool,
    admin: PgPool,
    schema: String,
}

impl TestStore {
    /// Connect using `DATABASE_URL` and seed a fresh schema.
    ///
    /// Returns `None` when no database is configured.
    pub async fn connect() -> Option<Self> {
        dotenvy::dotenv().ok();

        let Ok(config) = Config::from_env() else {
            eprintln!("DATABASE_URL not set, skipping store-backed test");
            return None;
        };

        let schema = format!(
            "storefront_test_{}_{}",
            std::process::id(),
            NEXT_SCHEMA.fetch_add(1, Ordering::SeqCst)
        );

        let admin = PgPool::connect(&config.database_url)
            .await
            .expect("Failed to connect to PostgreSQL");
        sqlx::query(&format!("DROP SCHEMA IF EXISTS \"{schema}\" CASCADE"))
            .execute(&admin)
            .await
            .expect("Failed to drop stale test schema");
        sqlx::query(&format!("CREATE SCHEMA \"{schema}\""))
            .execute(&admin)
            .await
            .expect("Failed to create test schema");

        let search_path = format!("SET search_path TO \"{schema}\"");
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    sqlx::query(&search_path).execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(&config.database_url)
            .await
            .expect("Failed to create test pool");

        sqlx::raw_sql(CATALOGUE_SQL)
            .execute(&pool)
            .await
            .expect("Failed to seed catalogue");

        Some(Self {
            pool,
            admin,
            schema,
        })
    }

    /// Executor over the seeded schema.
    pub fn executor(&self) -> Arc<dyn QueryExecutor> {
        Arc::new(self.pool.clone())
    }

    /// Close the pool and drop the schema.
    pub async fn teardown(self) {
        self.pool.close().await;
        sqlx::query(&format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .ok();
    }
}
