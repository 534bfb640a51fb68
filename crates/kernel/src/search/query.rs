//! Query-in-progress for product searches, built with SeaQuery.
//!
//! `ProductQuery` is a value: every `with_*` / `without_*` call consumes the
//! query and returns the changed copy, so a handler deriving its own shape
//! from a shared base never affects other handlers.

use std::collections::BTreeMap;

use sea_query::{
    Alias, Cond, IntoCondition, JoinType, Order, Query, SelectStatement, SimpleExpr,
};

use crate::schema::PRODUCT;

/// A join registered on the query, tagged with the table it includes.
#[derive(Debug, Clone)]
struct QueryJoin {
    table: String,
    alias: String,
    on: Cond,
}

/// Product query under construction. Always selects from `product AS product`.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    joins: Vec<QueryJoin>,
    conditions: Vec<SimpleExpr>,
    group_by: Vec<(String, String)>,
    order_by: Vec<(SimpleExpr, Order)>,
    parameters: BTreeMap<String, Vec<i64>>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inner join `table AS alias`. A join already using `alias` is replaced.
    pub fn with_join(mut self, table: &str, alias: &str, on: impl IntoCondition) -> Self {
        self.joins.retain(|j| j.alias != alias);
        self.joins.push(QueryJoin {
            table: table.to_string(),
            alias: alias.to_string(),
            on: on.into_condition(),
        });
        self
    }

    /// Drop every join of `table`.
    pub fn without_table_include(mut self, table: &str) -> Self {
        self.joins.retain(|j| j.table != table);
        self
    }

    /// Whether a join of `table` is part of the query.
    pub fn has_table_include(&self, table: &str) -> bool {
        self.joins.iter().any(|j| j.table == table)
    }

    pub fn with_condition(mut self, condition: SimpleExpr) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_group_by(mut self, alias: &str, column: &str) -> Self {
        self.group_by.push((alias.to_string(), column.to_string()));
        self
    }

    pub fn without_group_by(mut self) -> Self {
        self.group_by.clear();
        self
    }

    pub fn with_order_by(mut self, expr: impl Into<SimpleExpr>, order: Order) -> Self {
        self.order_by.push((expr.into(), order));
        self
    }

    pub fn without_order_by(mut self) -> Self {
        self.order_by.clear();
        self
    }

    /// Bind a named id-list parameter for handlers running later.
    pub fn with_parameter(mut self, name: &str, ids: Vec<i64>) -> Self {
        self.parameters.insert(name.to_string(), ids);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&[i64]> {
        self.parameters.get(name).map(Vec::as_slice)
    }

    /// Render the SELECT without columns; callers add their own projection.
    pub fn select(&self) -> SelectStatement {
        let mut query = Query::select();
        query.from_as(Alias::new(PRODUCT), Alias::new(PRODUCT));

        for join in &self.joins {
            query.join_as(
                JoinType::InnerJoin,
                Alias::new(&join.table),
                Alias::new(&join.alias),
                join.on.clone(),
            );
        }

        for condition in &self.conditions {
            query.and_where(condition.clone());
        }

        for (alias, column) in &self.group_by {
            query.group_by_col((Alias::new(alias), Alias::new(column)));
        }

        for (expr, order) in &self.order_by {
            query.order_by_expr(expr.clone(), order.clone());
        }

        query
    }
}
