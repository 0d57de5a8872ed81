//! Seed the catalog with sample products.

use tracing::info;

use webshop_core::Price;
use webshop_server::config::WebshopConfig;
use webshop_server::db::{self, ProductRepository};
use webshop_server::models::product::NewProduct;

/// (name, description, price, image, category, stock)
const SAMPLE_PRODUCTS: &[(&str, &str, &str, &str, &str, i64)] = &[
    (
        "Wireless Headphones",
        "High-quality wireless headphones with noise cancellation",
        "99.99",
        "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=300&h=200&fit=crop",
        "Electronics",
        50,
    ),
    (
        "Smart Watch",
        "Advanced smartwatch with health monitoring features",
        "199.99",
        "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=300&h=200&fit=crop",
        "Electronics",
        25,
    ),
    (
        "Laptop Stand",
        "Adjustable laptop stand for better ergonomics",
        "49.99",
        "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?w=300&h=200&fit=crop",
        "Accessories",
        100,
    ),
    (
        "Bluetooth Speaker",
        "Portable Bluetooth speaker with excellent sound quality",
        "79.99",
        "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=300&h=200&fit=crop",
        "Electronics",
        75,
    ),
    (
        "Mechanical Keyboard",
        "RGB mechanical keyboard for gaming and typing",
        "129.99",
        "https://images.unsplash.com/photo-1541140532154-b024d705b90a?w=300&h=200&fit=crop",
        "Accessories",
        30,
    ),
    (
        "Gaming Mouse",
        "High-precision gaming mouse with customizable buttons",
        "59.99",
        "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?w=300&h=200&fit=crop",
        "Accessories",
        40,
    ),
];

/// Insert the sample product catalog.
///
/// # Arguments
///
/// * `clear_existing` - If true, delete all existing products first
///
/// # Errors
///
/// Returns an error if configuration loading or a database operation fails.
pub async fn products(clear_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = WebshopConfig::from_env()?;

    if let Some(dir) = config.database_parent_dir() {
        std::fs::create_dir_all(&dir)?;
    }

    let pool = db::create_pool(&config.database_url).await?;
    db::MIGRATOR.run(&pool).await?;
    info!("Connected to database");

    let repo = ProductRepository::new(&pool);

    if clear_existing {
        let removed = repo.delete_all().await?;
        info!("Removed {removed} existing products");
    }

    for (name, description, price, image, category, stock) in SAMPLE_PRODUCTS {
        let new = NewProduct {
            name: (*name).to_owned(),
            description: Some((*description).to_owned()),
            price: Price::parse(price)?,
            image: Some((*image).to_owned()),
            category: Some((*category).to_owned()),
            stock: Some(*stock),
        };
        let product = repo.create(&new).await?;
        info!("Added: {name} (ID: {})", product.id);
    }

    info!("Sample products added successfully!");
    Ok(())
}
