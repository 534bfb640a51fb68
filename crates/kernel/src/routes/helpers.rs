//! Shared route helpers for request parsing and context resolution.

use crate::error::{AppError, AppResult};
use crate::models::{ShopContext, ShopId};
use crate::state::AppState;

/// Parse a comma-separated id list such as `3,5,8`. Empty segments are skipped.
pub fn parse_id_list(raw: &str) -> AppResult<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("invalid id '{s}'")))
        })
        .collect()
}

/// Resolve the shop context for a request, 404 for unknown shops.
pub async fn resolve_context(state: &AppState, shop_id: Option<ShopId>) -> AppResult<ShopContext> {
    state
        .contexts()
        .create_context(shop_id)
        .await?
        .ok_or(AppError::NotFound)
}
