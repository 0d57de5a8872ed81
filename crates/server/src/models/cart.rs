//! Cart models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use webshop_core::{CartId, CartItemId, Price, ProductId};

/// A cart header row, one per session token.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cart {
    pub id: CartId,
    pub session_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product line within a cart.
///
/// `price` is the snapshot captured when the product was first added; it is
/// never re-synced to later catalog price changes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

/// A line item joined with live catalog data for display.
///
/// `product_price` is the catalog's current price, distinct from the stored
/// `price` snapshot.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItemDetail {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub image: Option<String>,
    pub product_price: Price,
}
