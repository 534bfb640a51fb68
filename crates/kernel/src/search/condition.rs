//! Translation of criteria conditions and sortings into a `ProductQuery`.

use sea_query::{Cond, Order};

use super::criteria::{Condition, Criteria, SortDirection, Sorting};
use super::query::ProductQuery;
use crate::schema::{PRODUCT, PRODUCT_CATEGORY_RO, col, col_ref};

/// Parameter holding the category ids bound by a category condition.
pub const CATEGORY_PARAMETER: &str = "category";

/// Alias under which category assignments are joined.
pub(super) const PRODUCT_CATEGORY_ALIAS: &str = "product_category";

/// Build the base query for `criteria`: every condition and sorting applied,
/// facets left to their handlers.
pub fn build_query(criteria: &Criteria) -> ProductQuery {
    let query = criteria
        .conditions
        .iter()
        .fold(ProductQuery::new(), apply_condition);

    criteria.sortings.iter().fold(query, apply_sorting)
}

fn apply_condition(query: ProductQuery, condition: &Condition) -> ProductQuery {
    match condition {
        Condition::Category { category_ids } => query
            .with_join(
                PRODUCT_CATEGORY_RO,
                PRODUCT_CATEGORY_ALIAS,
                Cond::all()
                    .add(col(PRODUCT_CATEGORY_ALIAS, "product_id").equals(col_ref(PRODUCT, "id")))
                    .add(
                        col(PRODUCT_CATEGORY_ALIAS, "category_id")
                            .is_in(category_ids.iter().copied()),
                    ),
            )
            .with_parameter(CATEGORY_PARAMETER, category_ids.clone()),
        Condition::ProductIds { ids } => {
            query.with_condition(col(PRODUCT, "id").is_in(ids.iter().copied()))
        }
        Condition::Active => query.with_condition(col(PRODUCT, "active").eq(true)),
    }
}

fn apply_sorting(query: ProductQuery, sorting: &Sorting) -> ProductQuery {
    let (column, direction) = match sorting {
        Sorting::Name(direction) => ("name", direction),
        Sorting::ProductId(direction) => ("id", direction),
    };
    let order = match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    };
    query.with_order_by(col(PRODUCT, column), order)
}
