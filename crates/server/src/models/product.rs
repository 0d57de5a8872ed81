//! Product catalog models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use webshop_core::{Price, ProductId};

/// A catalog product row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product.
#[derive(Debug, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i64>,
}

/// An arbitrary subset of product fields to overwrite.
#[derive(Debug, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i64>,
}

impl ProductUpdate {
    /// Whether no field was supplied at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.category.is_none()
            && self.stock.is_none()
    }
}
