//! Product repository for catalog CRUD.
//!
//! Plain CRUD over the `products` table. No validation beyond column
//! constraints and the non-negativity baked into [`webshop_core::Price`].

use sqlx::SqlitePool;

use webshop_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductUpdate};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, image, category, stock, created_at, updated_at
            FROM products
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, description, price, image, category, stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a new product, returning it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (name, description, price, image, category, stock)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, name, description, price, image, category, stock, created_at, updated_at
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.image)
        .bind(&new.category)
        .bind(new.stock.unwrap_or(0))
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Update an arbitrary subset of a product's fields.
    ///
    /// Unsupplied fields keep their stored values. The caller is expected to
    /// reject an entirely empty update before reaching this layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE products
            SET name = COALESCE(?2, name),
                description = COALESCE(?3, description),
                price = COALESCE(?4, price),
                image = COALESCE(?5, image),
                category = COALESCE(?6, category),
                stock = COALESCE(?7, stock),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?1
            RETURNING id, name, description, price, image, category, stock, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price)
        .bind(&update.image)
        .bind(&update.category)
        .bind(update.stock)
        .fetch_optional(self.pool)
        .await?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product by its ID.
    ///
    /// Line items referencing the product are removed by the cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every product, returning how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use webshop_core::Price;

    use super::*;
    use crate::db::test_pool;

    fn sample_product(name: &str, price: &str) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            description: Some("test product".to_owned()),
            price: Price::parse(price).unwrap(),
            image: None,
            category: Some("Testing".to_owned()),
            stock: Some(10),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_get_roundtrips() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&sample_product("Widget", "19.99")).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price, Price::parse("19.99").unwrap());
        assert_eq!(fetched.stock, 10);
    }

    #[tokio::test]
    async fn test_create_defaults_stock_to_zero() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let mut new = sample_product("Widget", "1.00");
        new.stock = None;
        let created = repo.create(&new).await.unwrap();

        assert_eq!(created.stock, 0);
    }

    #[tokio::test]
    async fn test_list_returns_all_in_id_order() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let first = repo.create(&sample_product("A", "1.00")).await.unwrap();
        let second = repo.create(&sample_product("B", "2.00")).await.unwrap();

        let products = repo.list().await.unwrap();
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_update_touches_only_supplied_fields() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&sample_product("Widget", "10.00")).await.unwrap();

        let update = ProductUpdate {
            price: Some(Price::parse("15.00").unwrap()),
            ..ProductUpdate::default()
        };
        let updated = repo.update(created.id, &update).await.unwrap();

        assert_eq!(updated.price, Price::parse("15.00").unwrap());
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.stock, created.stock);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let update = ProductUpdate {
            name: Some("Ghost".to_owned()),
            ..ProductUpdate::default()
        };
        let err = repo.update(ProductId::new(999), &update).await.unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&sample_product("Widget", "5.00")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
    }
}
