#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Facet generation integration tests.
//!
//! Runs the real handlers and search service against a recording executor
//! and a static category lookup.

mod common;

use std::sync::Arc;

use sea_query::PostgresQueryBuilder;
use serde_json::json;

use common::{FailingExecutor, RecordingExecutor, StaticCategories, category, row};
use storefront_kernel::models::{Category, ShopContext};
use storefront_kernel::search::{
    CategoryFacet, CategoryFacetHandler, Condition, Criteria, Facet, FacetHandler,
    ManufacturerFacet, ManufacturerFacetHandler, SearchService, build_query,
};

fn category_facet() -> Facet {
    Facet::Category(CategoryFacet::default())
}

fn categories_of(facet: Facet) -> Vec<Category> {
    match facet {
        Facet::Category(facet) => facet.categories,
        other => panic!("expected a category facet, got {}", other.kind()),
    }
}

async fn generate(
    executor: &Arc<RecordingExecutor>,
    categories: &Arc<StaticCategories>,
    criteria: &Criteria,
) -> Vec<Category> {
    let handler = CategoryFacetHandler::new(executor.clone(), categories.clone());
    let facet = handler
        .generate_facet(
            category_facet(),
            &build_query(criteria),
            criteria,
            &ShopContext::default(),
        )
        .await
        .unwrap();
    categories_of(facet)
}

// -------------------------------------------------------------------------
// Category facet
// -------------------------------------------------------------------------

#[tokio::test]
async fn unfiltered_request_counts_children_of_root() {
    let executor = Arc::new(RecordingExecutor::new().respond(vec![
        row(json!({"id": 5, "total": 12})),
        row(json!({"id": 6, "total": 3})),
    ]));
    let categories = Arc::new(StaticCategories::new(vec![category(5, 1, 2), category(6, 1, 1)]));

    let facet = generate(&executor, &categories, &Criteria::new()).await;

    let sql = &executor.queries()[0];
    assert!(sql.contains(r#""category"."parent_id" IN (1)"#), "{sql}");

    // Ordered by position, each carrying its total.
    let ids: Vec<i64> = facet.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![6, 5]);
    assert_eq!(facet[0].facet_total(), Some(3));
    assert_eq!(facet[1].facet_total(), Some(12));
}

#[tokio::test]
async fn bound_categories_become_parents() {
    let executor = Arc::new(RecordingExecutor::new().respond(vec![row(json!({"id": 9, "total": 4}))]));
    let categories = Arc::new(StaticCategories::new(vec![category(9, 3, 1)]));
    let criteria = Criteria::new().with_condition(Condition::Category {
        category_ids: vec![3],
    });

    let facet = generate(&executor, &categories, &criteria).await;

    assert!(executor.queries()[0].contains(r#""category"."parent_id" IN (3)"#));
    assert_eq!(facet.len(), 1);
    assert_eq!(facet[0].facet_total(), Some(4));
}

#[tokio::test]
async fn unresolvable_categories_are_skipped() {
    let executor = Arc::new(RecordingExecutor::new().respond(vec![
        row(json!({"id": 5, "total": 2})),
        row(json!({"id": 7, "total": 8})),
        row(json!({"id": 99, "total": 1})),
    ]));
    let mut hidden = category(7, 1, 1);
    hidden.active = false;
    let categories = Arc::new(StaticCategories::new(vec![category(5, 1, 1), hidden]));

    let facet = generate(&executor, &categories, &Criteria::new()).await;

    assert_eq!(facet.len(), 1);
    assert_eq!(facet[0].id, 5);
    assert_eq!(categories.calls(), vec![vec![5, 7, 99]]);
}

#[tokio::test]
async fn no_counts_means_no_lookup() {
    let executor = Arc::new(RecordingExecutor::new());
    let categories = Arc::new(StaticCategories::new(vec![category(5, 1, 1)]));

    let facet = generate(&executor, &categories, &Criteria::new()).await;

    assert!(facet.is_empty());
    assert!(categories.calls().is_empty());
}

#[tokio::test]
async fn equal_positions_order_by_id() {
    let executor = Arc::new(RecordingExecutor::new().respond(vec![
        row(json!({"id": 8, "total": 1})),
        row(json!({"id": 4, "total": 1})),
    ]));
    let categories = Arc::new(StaticCategories::new(vec![category(8, 1, 0), category(4, 1, 0)]));

    let facet = generate(&executor, &categories, &Criteria::new()).await;

    let ids: Vec<i64> = facet.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![4, 8]);
}

#[tokio::test]
async fn base_query_is_left_untouched() {
    let executor = Arc::new(RecordingExecutor::new());
    let categories = Arc::new(StaticCategories::default());
    let criteria = Criteria::new().with_condition(Condition::Category {
        category_ids: vec![3],
    });
    let query = build_query(&criteria);
    let before = query.select().to_string(PostgresQueryBuilder);

    CategoryFacetHandler::new(executor.clone(), categories)
        .generate_facet(category_facet(), &query, &criteria, &ShopContext::default())
        .await
        .unwrap();

    assert_eq!(query.select().to_string(PostgresQueryBuilder), before);
    assert_eq!(query.parameter("category"), Some(&[3][..]));
}

#[tokio::test]
async fn category_handler_rejects_other_facets() {
    let handler = CategoryFacetHandler::new(
        Arc::new(RecordingExecutor::new()),
        Arc::new(StaticCategories::default()),
    );
    let manufacturer = Facet::Manufacturer(ManufacturerFacet::default());

    assert!(handler.supports_facet(&category_facet()));
    assert!(!handler.supports_facet(&manufacturer));

    let criteria = Criteria::new();
    let err = handler
        .generate_facet(
            manufacturer,
            &build_query(&criteria),
            &criteria,
            &ShopContext::default(),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("manufacturer"));
}

// -------------------------------------------------------------------------
// Manufacturer facet
// -------------------------------------------------------------------------

#[tokio::test]
async fn manufacturer_rows_become_counts() {
    let executor = Arc::new(RecordingExecutor::new().respond(vec![
        row(json!({"id": 2, "name": "Acme", "total": 7})),
        row(json!({"id": 1, "name": "Zenith", "total": 1})),
    ]));
    let handler = ManufacturerFacetHandler::new(executor.clone());
    let criteria = Criteria::new();

    let facet = handler
        .generate_facet(
            Facet::Manufacturer(ManufacturerFacet::default()),
            &build_query(&criteria),
            &criteria,
            &ShopContext::default(),
        )
        .await
        .unwrap();

    let Facet::Manufacturer(facet) = facet else {
        panic!("expected a manufacturer facet");
    };
    assert_eq!(facet.manufacturers.len(), 2);
    assert_eq!(facet.manufacturers[0].name, "Acme");
    assert_eq!(facet.manufacturers[0].total, 7);
}

// -------------------------------------------------------------------------
// Search service
// -------------------------------------------------------------------------

#[tokio::test]
async fn service_generates_facets_in_request_order() {
    let executor = Arc::new(
        RecordingExecutor::new()
            .respond(vec![row(json!({"id": 2, "name": "Acme", "total": 7}))])
            .respond(vec![row(json!({"id": 5, "total": 3}))]),
    );
    let categories = Arc::new(StaticCategories::new(vec![category(5, 1, 1)]));
    let service = SearchService::with_default_handlers(executor.clone(), categories);

    let criteria = Criteria::new()
        .with_facet(Facet::Manufacturer(ManufacturerFacet::default()))
        .with_facet(category_facet());
    let facets = service.facets(&criteria, &ShopContext::default()).await.unwrap();

    let kinds: Vec<&str> = facets.iter().map(Facet::kind).collect();
    assert_eq!(kinds, vec!["manufacturer", "category"]);
    assert_eq!(executor.queries().len(), 2);
    assert_eq!(categories_of(facets[1].clone())[0].facet_total(), Some(3));
}

#[tokio::test]
async fn missing_handler_is_an_error() {
    let executor = Arc::new(RecordingExecutor::new());
    let service = SearchService::new(vec![Arc::new(ManufacturerFacetHandler::new(executor))]);

    let criteria = Criteria::new().with_facet(category_facet());
    let err = service
        .facets(&criteria, &ShopContext::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no facet handler registered for 'category'"));
}

#[tokio::test]
async fn store_failures_surface_from_the_service() {
    let service = SearchService::with_default_handlers(
        Arc::new(FailingExecutor),
        Arc::new(StaticCategories::default()),
    );

    let criteria = Criteria::new().with_facet(category_facet());
    let err = service
        .facets(&criteria, &ShopContext::default())
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("connection reset"));
}
