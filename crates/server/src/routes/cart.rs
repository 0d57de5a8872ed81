//! Cart route handlers.
//!
//! Every operation is scoped to the opaque cart token held in the caller's
//! session; the token is minted on first contact, so `GET /api/cart` on a
//! fresh session already creates (and returns) an empty cart.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use webshop_core::ProductId;

use crate::db::{CartRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::cart::{Cart, CartItem, CartItemDetail};
use crate::models::session::keys;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the opaque cart token for this session, minting one on first contact.
async fn cart_token(session: &Session) -> Result<String> {
    if let Some(token) = session
        .get::<String>(keys::CART_TOKEN)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?
    {
        return Ok(token);
    }

    let token = Uuid::new_v4().to_string();
    session
        .insert(keys::CART_TOKEN, &token)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(token)
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    /// Defaults to 1 when omitted.
    pub quantity: Option<i64>,
}

/// Body for overwriting a line item's quantity.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

/// The caller's cart with its line items.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Cart,
    pub items: Vec<CartItemDetail>,
}

/// Result of an add, including the merged line item.
#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    pub success: bool,
    pub item: CartItem,
    pub items: Vec<CartItemDetail>,
}

/// Result of an update or removal.
#[derive(Debug, Serialize)]
pub struct CartItemsResponse {
    pub success: bool,
    pub items: Vec<CartItemDetail>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Return the session's cart and line items, creating the cart if needed.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartResponse>> {
    let token = cart_token(&session).await?;
    let repo = CartRepository::new(state.pool());

    let cart = repo.resolve(&token).await?;
    let items = repo.list_items(cart.id).await?;

    Ok(Json(CartResponse { cart, items }))
}

/// Add a product to the session's cart, merging with an existing line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<AddItemResponse>> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_owned(),
        ));
    }

    let token = cart_token(&session).await?;
    let repo = CartRepository::new(state.pool());
    let cart = repo.resolve(&token).await?;

    let item = repo
        .add_item(cart.id, body.product_id, quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
            other => AppError::Database(other),
        })?;

    let items = repo.list_items(cart.id).await?;
    Ok(Json(AddItemResponse {
        success: true,
        item,
        items,
    }))
}

/// Set a line item's quantity; zero or less removes it.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
    Json(body): Json<SetQuantityRequest>,
) -> Result<Json<CartItemsResponse>> {
    let token = cart_token(&session).await?;
    let repo = CartRepository::new(state.pool());
    let cart = repo.resolve(&token).await?;

    let matched = repo
        .set_item_quantity(cart.id, product_id, body.quantity)
        .await?;
    if !matched {
        return Err(AppError::NotFound("Item not found in cart".to_owned()));
    }

    let items = repo.list_items(cart.id).await?;
    Ok(Json(CartItemsResponse {
        success: true,
        items,
    }))
}

/// Remove a line item from the session's cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartItemsResponse>> {
    let token = cart_token(&session).await?;
    let repo = CartRepository::new(state.pool());
    let cart = repo.resolve(&token).await?;

    let removed = repo.remove_item(cart.id, product_id).await?;
    if !removed {
        return Err(AppError::NotFound("Item not found in cart".to_owned()));
    }

    let items = repo.list_items(cart.id).await?;
    Ok(Json(CartItemsResponse {
        success: true,
        items,
    }))
}
