//! Demo catalog and accounts for local development.

use crate::application::auth_service::AuthService;
use crate::domain::product::{NewProduct, Product};
use crate::domain::repository::{ProductRepository, UserRepository};
use crate::domain::user::CreateUser;
use anyhow::Result;
use tracing::{info, instrument, warn};

pub const DEMO_USER_EMAIL: &str = "test@test.com";
pub const DEMO_USER_PASSWORD: &str = "123456";
pub const DEMO_ADMIN_EMAIL: &str = "admin@test.com";
pub const DEMO_ADMIN_PASSWORD: &str = "password";

const CATALOG: &[(&str, f64, &str, &str)] = &[
    ("iPhone 15 Pro", 999.0, "Latest iPhone with Titanium build.", "https://images.unsplash.com/photo-1696446701796-da61225697cc?q=80&w=800&auto=format&fit=crop"),
    ("MacBook Air M3", 1299.0, "Powerful and portable laptop.", "https://images.unsplash.com/photo-1517336714460-d1508b82aae1?q=80&w=800&auto=format&fit=crop"),
    ("Sony WH-1000XM5", 349.0, "Industry leading noise cancellation.", "https://images.unsplash.com/photo-1618366712010-f4ae9c647dcb?q=80&w=800&auto=format&fit=crop"),
    ("Kindle Paperwhite", 139.0, "The best e-reader for book lovers.", "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?q=80&w=800&auto=format&fit=crop"),
    ("Logitech MX Master 3S", 99.0, "Ultimate productivity mouse.", "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?q=80&w=800&auto=format&fit=crop"),
    ("Apple Watch Series 9", 399.0, "Advanced health features.", "https://images.unsplash.com/photo-1546868871-7041f2a55e12?q=80&w=800&auto=format&fit=crop"),
    ("Nintendo Switch OLED", 349.0, "Amazing gaming on the go.", "https://images.unsplash.com/photo-1578303372216-f12a5c364e62?q=80&w=800&auto=format&fit=crop"),
    ("iPad Pro 12.9", 1099.0, "The power of M2 chip.", "https://images.unsplash.com/photo-1544244015-0df4b3ffc6b0?q=80&w=800&auto=format&fit=crop"),
    ("Samsung S24 Ultra", 1199.0, "The AI phone experience.", "https://images.unsplash.com/photo-1610945265064-0e34e5519bbf?q=80&w=800&auto=format&fit=crop"),
    ("DJI Mini 4 Pro", 759.0, "Professional drone for everyone.", "https://images.unsplash.com/photo-1473968512647-3e447244af8f?q=80&w=800&auto=format&fit=crop"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
}

/// Registers a demo user and a demo admin and stocks the catalog. Does nothing
/// if the demo accounts already exist.
#[instrument(skip_all)]
pub async fn seed_demo_data<U, P>(
    auth_service: &AuthService<U>,
    user_repository: &U,
    product_repository: &P,
) -> Result<SeedReport>
where
    U: UserRepository,
    P: ProductRepository,
{
    if user_repository
        .find_user_by_email(DEMO_ADMIN_EMAIL)
        .await?
        .is_some()
    {
        warn!("Demo data already present, skipping seed");
        return Ok(SeedReport {
            users: 0,
            products: 0,
        });
    }

    for (email, password) in [
        (DEMO_USER_EMAIL, DEMO_USER_PASSWORD),
        (DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD),
    ] {
        auth_service
            .register(CreateUser {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
    }
    auth_service.promote_to_admin(DEMO_ADMIN_EMAIL).await?;

    for (title, price, description, image) in CATALOG {
        let product = Product::new(
            NewProduct {
                title: title.to_string(),
                price: *price,
                description: description.to_string(),
                image: image.to_string(),
            },
            None,
        );
        product_repository.insert(product).await?;
    }

    let report = SeedReport {
        users: 2,
        products: CATALOG.len(),
    };
    info!(users = report.users, products = report.products, "Database seeded successfully");
    Ok(report)
}
