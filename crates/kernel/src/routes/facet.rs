//! Search facet API routes.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::helpers::{parse_id_list, resolve_context};
use crate::error::{AppError, AppResult};
use crate::models::ShopId;
use crate::search::{Condition, Criteria, Facet};
use crate::state::AppState;

/// Create the facet router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/search/facets", get(search_facets))
}

#[derive(Deserialize)]
struct FacetParams {
    /// Comma-separated category ids; absent or empty means no category filter.
    category: Option<String>,
    /// Comma-separated facet kinds (default: `category`).
    facets: Option<String>,
    shop: Option<ShopId>,
}

#[derive(Serialize)]
struct FacetsResponse {
    facets: Vec<Facet>,
}

async fn search_facets(
    State(state): State<AppState>,
    Query(params): Query<FacetParams>,
) -> AppResult<Json<FacetsResponse>> {
    let mut criteria = Criteria::new();

    let category_ids = parse_id_list(params.category.as_deref().unwrap_or_default())?;
    if !category_ids.is_empty() {
        criteria = criteria.with_condition(Condition::Category { category_ids });
    }

    for kind in params
        .facets
        .as_deref()
        .unwrap_or("category")
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        let facet = Facet::from_kind(kind)
            .ok_or_else(|| AppError::BadRequest(format!("unknown facet '{kind}'")))?;
        criteria = criteria.with_facet(facet);
    }

    let context = resolve_context(&state, params.shop).await?;
    let facets = state.search().facets(&criteria, &context).await?;

    Ok(Json(FacetsResponse { facets }))
}
