//! Query execution seam between query building and the store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_query::{PostgresQueryBuilder, SelectStatement, Value};
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryScalar;

use super::rows::JsonRow;

/// Executes built SELECT statements and returns rows as JSON objects keyed
/// by column alias.
///
/// Every call is exactly one round trip to the store.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute the statement and fetch every row.
    async fn fetch_all(&self, query: &SelectStatement) -> Result<Vec<JsonRow>>;

    /// Check that the store is reachable.
    async fn ping(&self) -> bool;
}

type JsonScalarQuery<'q> = QueryScalar<'q, Postgres, serde_json::Value, PgArguments>;

#[async_trait]
impl QueryExecutor for PgPool {
    async fn fetch_all(&self, query: &SelectStatement) -> Result<Vec<JsonRow>> {
        let (sql, values) = query.build(PostgresQueryBuilder);
        let wrapped = format!("SELECT row_to_json(t) FROM ({sql}) t");
        tracing::debug!(sql = %sql, params = values.0.len(), "executing query");

        let mut statement = sqlx::query_scalar::<_, serde_json::Value>(&wrapped);
        for value in values.0 {
            statement = bind_value(statement, value)?;
        }

        let rows = statement
            .fetch_all(self)
            .await
            .context("failed to execute query")?;

        rows.into_iter()
            .map(|row| match row {
                serde_json::Value::Object(map) => Ok(map),
                other => anyhow::bail!("expected a JSON object row, got {other}"),
            })
            .collect()
    }

    async fn ping(&self) -> bool {
        super::check_health(self).await
    }
}

/// Bind a sea-query value as a positional parameter.
fn bind_value(query: JsonScalarQuery<'_>, value: Value) -> Result<JsonScalarQuery<'_>> {
    let query = match value {
        Value::Bool(v) => query.bind(v),
        Value::SmallInt(v) => query.bind(v),
        Value::Int(v) => query.bind(v),
        Value::BigInt(v) => query.bind(v),
        Value::Double(v) => query.bind(v),
        Value::String(v) => query.bind(v.map(|s| s.to_string())),
        other => anyhow::bail!("unsupported query parameter: {other:?}"),
    };
    Ok(query)
}
