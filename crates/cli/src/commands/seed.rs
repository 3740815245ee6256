//! Seed the database with a demo catalog and user.
//!
//! Intended for local development and integration tests: creates one demo
//! user plus a small catalog covering the interesting stock cases (tracked,
//! untracked, zero stock, inactive product).

use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::info;

use clementine_core::{Email, ProductStatus};
use clementine_storefront::db::{self, ProductRepository, RepositoryError, UserRepository};

/// Seed demo data, creating the demo user with the given email.
///
/// Re-running against an already-seeded database reports conflicts and
/// moves on rather than failing.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the email is
/// invalid, or a database operation fails.
pub async fn demo_data(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "STOREFRONT_DATABASE_URL not set")?;

    let email = Email::parse(email)?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let users = UserRepository::new(&pool);
    match users.create(&email).await {
        Ok(user) => info!(user_id = %user.id, email = %user.email, "Created demo user"),
        Err(RepositoryError::Conflict(_)) => {
            info!(email = %email, "Demo user already exists, skipping");
        }
        Err(e) => return Err(e.into()),
    }

    let products = ProductRepository::new(&pool);
    seed_catalog(&products).await?;

    info!("Seeding complete!");
    Ok(())
}

async fn seed_catalog(products: &ProductRepository<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog: &[(&str, ProductStatus, &[(&str, &str, Option<i32>)])] = &[
        (
            "Linen Shirt",
            ProductStatus::Active,
            &[
                ("SHIRT-S", "39.00", Some(25)),
                ("SHIRT-M", "39.00", Some(10)),
                ("SHIRT-L", "39.00", Some(0)),
            ],
        ),
        (
            "Canvas Tote",
            ProductStatus::Active,
            // Untracked stock: never sells out
            &[("TOTE-STD", "18.50", None)],
        ),
        (
            "Prototype Jacket",
            ProductStatus::Draft,
            &[("JACKET-PROTO", "120.00", Some(5))],
        ),
    ];

    for &(name, status, variants) in catalog {
        let product = match products.create_product(name, None, status).await {
            Ok(p) => p,
            Err(e) => return Err(e.into()),
        };
        info!(product_id = %product.id, name, "Created product");

        for &(sku, price, stock) in variants {
            let price: Decimal = price.parse()?;
            match products
                .create_variant(product.id, sku, price, stock, &serde_json::json!({}))
                .await
            {
                Ok(variant) => info!(variant_id = %variant.id, sku, "Created variant"),
                Err(RepositoryError::Conflict(_)) => {
                    info!(sku, "Variant already exists, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
