//! Similar products API routes.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::helpers::{parse_id_list, resolve_context};
use crate::error::{AppError, AppResult};
use crate::models::{ProductId, ShopId};
use crate::state::AppState;

/// Create the similar products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/product/{id}/similar", get(similar_for_product))
        .route("/api/products/similar", get(similar_for_products))
}

#[derive(Deserialize)]
struct ShopParams {
    shop: Option<ShopId>,
}

#[derive(Deserialize)]
struct BatchParams {
    ids: String,
    shop: Option<ShopId>,
}

#[derive(Serialize)]
struct SimilarResponse {
    product_id: ProductId,
    linked: Vec<String>,
    by_category: Vec<String>,
}

#[derive(Serialize)]
struct BatchSimilarResponse {
    linked: HashMap<ProductId, Vec<String>>,
    by_category: HashMap<ProductId, Vec<String>>,
}

async fn similar_for_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(params): Query<ShopParams>,
) -> AppResult<Json<SimilarResponse>> {
    let context = resolve_context(&state, params.shop).await?;
    let gateway = state.similar();

    let (linked, by_category) = tokio::try_join!(
        gateway.get(id, &context),
        gateway.get_by_category(id, &context)
    )?;

    Ok(Json(SimilarResponse {
        product_id: id,
        linked,
        by_category,
    }))
}

async fn similar_for_products(
    State(state): State<AppState>,
    Query(params): Query<BatchParams>,
) -> AppResult<Json<BatchSimilarResponse>> {
    let ids = parse_id_list(&params.ids)?;
    if ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".to_string()));
    }

    let context = resolve_context(&state, params.shop).await?;
    let gateway = state.similar();

    let (linked, by_category) = tokio::try_join!(
        gateway.get_list(&ids, &context),
        gateway.get_list_by_category(&ids, &context)
    )?;

    Ok(Json(BatchSimilarResponse {
        linked,
        by_category,
    }))
}
