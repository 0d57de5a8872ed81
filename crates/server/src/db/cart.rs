//! Cart repository: session-to-cart resolution and line item reconciliation.
//!
//! The write paths are single conditional upserts keyed on the schema's
//! unique constraints, so concurrent requests for the same session cannot
//! duplicate a cart header or a line item.

use sqlx::SqlitePool;

use webshop_core::{CartId, Price, ProductId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartItem, CartItemDetail};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve a session token to its cart header, creating one if absent.
    ///
    /// Idempotent: repeated calls with the same token return the same row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn resolve(&self, session_token: &str) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            INSERT INTO carts (session_token)
            VALUES (?1)
            ON CONFLICT (session_token) DO UPDATE SET updated_at = CURRENT_TIMESTAMP
            RETURNING id, session_token, created_at, updated_at
            ",
        )
        .bind(session_token)
        .fetch_one(self.pool)
        .await?;

        Ok(cart)
    }

    /// Add a quantity of a product to a cart, merging with any existing line.
    ///
    /// On first add the product's current catalog price is captured as the
    /// line's price snapshot; repeat adds sum quantities and leave the
    /// snapshot untouched. Accumulation is unbounded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartItem, RepositoryError> {
        let price: Option<Price> = sqlx::query_scalar("SELECT price FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(self.pool)
            .await?;
        let price = price.ok_or(RepositoryError::NotFound)?;

        let item = sqlx::query_as::<_, CartItem>(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity, price)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (cart_id, product_id)
                DO UPDATE SET quantity = quantity + excluded.quantity
            RETURNING id, cart_id, product_id, quantity, price, created_at
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Overwrite the stored quantity for a line item.
    ///
    /// A quantity of zero or less removes the line instead, exactly like
    /// [`Self::remove_item`].
    ///
    /// # Returns
    ///
    /// Returns `true` if a matching line existed, `false` otherwise (not an
    /// error).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<bool, RepositoryError> {
        if quantity <= 0 {
            return self.remove_item(cart_id, product_id).await;
        }

        let result = sqlx::query(
            "UPDATE cart_items SET quantity = ?3 WHERE cart_id = ?1 AND product_id = ?2",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the matching line item.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted, `false` if none matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1 AND product_id = ?2")
                .bind(cart_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a cart's line items joined with live catalog data.
    ///
    /// Each row carries both the stored price snapshot (`price`) and the
    /// product's current catalog price (`product_price`). Totals use the
    /// snapshot; the live price is informational.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_items(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<CartItemDetail>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItemDetail>(
            r"
            SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.price, ci.created_at,
                   p.name, p.image, p.price AS product_price
            FROM cart_items ci
            JOIN products p ON ci.product_id = p.id
            WHERE ci.cart_id = ?1
            ORDER BY ci.id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use webshop_core::Price;

    use super::*;
    use crate::db::test_pool;
    use crate::db::products::ProductRepository;
    use crate::models::product::{NewProduct, ProductUpdate};

    async fn seed_product(pool: &SqlitePool, name: &str, price: &str) -> ProductId {
        let new = NewProduct {
            name: name.to_owned(),
            description: None,
            price: Price::parse(price).unwrap(),
            image: Some("https://img.test/p.jpg".to_owned()),
            category: None,
            stock: Some(5),
        };
        ProductRepository::new(pool).create(&new).await.unwrap().id
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);

        let first = repo.resolve("session-abc").await.unwrap();
        let second = repo.resolve("session-abc").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.session_token, "session-abc");
    }

    #[tokio::test]
    async fn test_distinct_tokens_get_distinct_carts() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);

        let a = repo.resolve("session-a").await.unwrap();
        let b = repo.resolve("session-b").await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_repeat_add_merges_quantities_and_keeps_snapshot() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);
        let product_id = seed_product(&pool, "Widget", "10.00").await;
        let cart = repo.resolve("session-merge").await.unwrap();

        let first = repo.add_item(cart.id, product_id, 2).await.unwrap();
        let merged = repo.add_item(cart.id, product_id, 3).await.unwrap();

        assert_eq!(merged.id, first.id);
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.price, Price::parse("10.00").unwrap());

        let items = repo.list_items(cart.id).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);
        let cart = repo.resolve("session-missing").await.unwrap();

        let err = repo
            .add_item(cart.id, ProductId::new(999), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound));
        assert!(repo.list_items(cart.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_survives_catalog_price_change() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);
        let product_id = seed_product(&pool, "Widget", "10.00").await;
        let cart = repo.resolve("session-snapshot").await.unwrap();

        repo.add_item(cart.id, product_id, 1).await.unwrap();

        let update = ProductUpdate {
            price: Some(Price::parse("15.00").unwrap()),
            ..ProductUpdate::default()
        };
        ProductRepository::new(&pool)
            .update(product_id, &update)
            .await
            .unwrap();

        let items = repo.list_items(cart.id).await.unwrap();
        let item = items.first().unwrap();
        assert_eq!(item.price, Price::parse("10.00").unwrap());
        assert_eq!(item.product_price, Price::parse("15.00").unwrap());
    }

    #[tokio::test]
    async fn test_set_quantity_overwrites() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);
        let product_id = seed_product(&pool, "Widget", "10.00").await;
        let cart = repo.resolve("session-set").await.unwrap();

        repo.add_item(cart.id, product_id, 2).await.unwrap();
        assert!(repo.set_item_quantity(cart.id, product_id, 7).await.unwrap());

        let items = repo.list_items(cart.id).await.unwrap();
        assert_eq!(items.first().unwrap().quantity, 7);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_or_negative_removes() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);
        let product_id = seed_product(&pool, "Widget", "10.00").await;
        let cart = repo.resolve("session-zero").await.unwrap();

        repo.add_item(cart.id, product_id, 2).await.unwrap();
        assert!(repo.set_item_quantity(cart.id, product_id, 0).await.unwrap());
        assert!(repo.list_items(cart.id).await.unwrap().is_empty());

        repo.add_item(cart.id, product_id, 2).await.unwrap();
        assert!(repo.set_item_quantity(cart.id, product_id, -3).await.unwrap());
        assert!(repo.list_items(cart.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_quantity_on_missing_line_reports_false() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);
        let product_id = seed_product(&pool, "Widget", "10.00").await;
        let cart = repo.resolve("session-nomatch").await.unwrap();

        assert!(!repo.set_item_quantity(cart.id, product_id, 4).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_reports_and_leaves_other_rows_alone() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);
        let kept = seed_product(&pool, "Kept", "1.00").await;
        let removed = seed_product(&pool, "Removed", "2.00").await;
        let cart = repo.resolve("session-remove").await.unwrap();

        repo.add_item(cart.id, kept, 1).await.unwrap();
        repo.add_item(cart.id, removed, 1).await.unwrap();

        assert!(repo.remove_item(cart.id, removed).await.unwrap());
        assert!(!repo.remove_item(cart.id, removed).await.unwrap());

        let items = repo.list_items(cart.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().product_id, kept);
    }

    #[tokio::test]
    async fn test_list_items_carries_catalog_fields() {
        let pool = test_pool().await;
        let repo = CartRepository::new(&pool);
        let product_id = seed_product(&pool, "Widget", "10.00").await;
        let cart = repo.resolve("session-detail").await.unwrap();

        repo.add_item(cart.id, product_id, 1).await.unwrap();

        let items = repo.list_items(cart.id).await.unwrap();
        let item = items.first().unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.image.as_deref(), Some("https://img.test/p.jpg"));
    }
}
