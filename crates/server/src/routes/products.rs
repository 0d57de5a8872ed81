//! Public catalog route handlers.

use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use webshop_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::Product;
use crate::state::AppState;

/// List the product catalog.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Fetch a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;
    Ok(Json(product))
}
