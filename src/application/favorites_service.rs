use crate::domain::error::DomainError;
use crate::domain::product::Product;
use crate::domain::repository::{ProductRepository, UserRepository};
use crate::domain::user::User;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

/// Per-user favorites. Every mutation is a single load-modify-save of the user
/// record, so concurrent toggles for the same user are last-write-wins.
///
/// Favorites are never cleaned up when a product is deleted; ids that no longer
/// resolve are dropped when the list is read.
pub struct FavoritesService<U: UserRepository, P: ProductRepository> {
    user_repository: Arc<U>,
    product_repository: Arc<P>,
}

impl<U: UserRepository, P: ProductRepository> FavoritesService<U, P> {
    pub fn new(user_repository: Arc<U>, product_repository: Arc<P>) -> Self {
        Self {
            user_repository,
            product_repository,
        }
    }

    #[instrument(skip(self))]
    pub async fn add(&self, user_id: &str, product_id: &str) -> Result<Vec<Product>> {
        if self.product_repository.find_by_id(product_id).await?.is_none() {
            return Err(DomainError::NotFound("Product not found".to_string()).into());
        }

        let mut user = self.load_user(user_id).await?;
        if user.has_favorite(product_id) {
            trace!("Product already in favorites");
        } else {
            user.favorites.push(product_id.to_string());
            user.updated_at = Utc::now();
            self.user_repository.update_user(user.clone()).await?;
            info!(favorites = user.favorites.len(), "Favorite added");
        }

        self.resolve(&user).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: &str, product_id: &str) -> Result<Vec<Product>> {
        let mut user = self.load_user(user_id).await?;
        let before = user.favorites.len();
        user.favorites.retain(|id| id != product_id);

        if user.favorites.len() != before {
            user.updated_at = Utc::now();
            self.user_repository.update_user(user.clone()).await?;
            info!(favorites = user.favorites.len(), "Favorite removed");
        } else {
            trace!("Product was not in favorites");
        }

        self.resolve(&user).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: &str) -> Result<Vec<Product>> {
        let user = self.load_user(user_id).await?;
        self.resolve(&user).await
    }

    async fn load_user(&self, user_id: &str) -> Result<User> {
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("User not found".to_string()).into())
    }

    async fn resolve(&self, user: &User) -> Result<Vec<Product>> {
        let products = self.product_repository.find_many(&user.favorites).await?;
        let dangling = user.favorites.len() - products.len();
        if dangling > 0 {
            debug!(user_id = %user.id, dangling = dangling, "Skipped favorites of deleted products");
        }
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::product_repository::InMemoryProductRepository;
    use crate::data::user_repository::InMemoryUserRepository;
    use crate::domain::product::NewProduct;
    use crate::domain::user::Role;

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        products: Arc<InMemoryProductRepository>,
        favorites: FavoritesService<InMemoryUserRepository, InMemoryProductRepository>,
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let products = Arc::new(InMemoryProductRepository::new());
        users
            .save_user(User {
                id: "buyer".to_string(),
                email: "buyer@test.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::User,
                favorites: Vec::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        let favorites = FavoritesService::new(users.clone(), products.clone());
        Fixture {
            users,
            products,
            favorites,
        }
    }

    async fn stock(fixture: &Fixture, title: &str) -> Product {
        let product = Product::new(
            NewProduct {
                title: title.to_string(),
                price: 5.0,
                description: "thing".to_string(),
                image: "http://x/y.png".to_string(),
            },
            None,
        );
        fixture.products.insert(product.clone()).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let f = fixture().await;
        let lamp = stock(&f, "Lamp").await;

        f.favorites.add("buyer", &lamp.id).await.unwrap();
        let list = f.favorites.add("buyer", &lamp.id).await.unwrap();

        assert_eq!(list, vec![lamp.clone()]);
        let stored = f.users.find_user_by_id("buyer").await.unwrap().unwrap();
        assert_eq!(stored.favorites, vec![lamp.id]);
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() {
        let f = fixture().await;
        let err = f.favorites.add("buyer", "missing").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
        assert!(f.favorites.list("buyer").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_favorite_is_noop() {
        let f = fixture().await;
        let lamp = stock(&f, "Lamp").await;
        f.favorites.add("buyer", &lamp.id).await.unwrap();

        let list = f.favorites.remove("buyer", "never-added").await.unwrap();
        assert_eq!(list, vec![lamp]);
    }

    #[tokio::test]
    async fn test_remove_drops_favorite() {
        let f = fixture().await;
        let lamp = stock(&f, "Lamp").await;
        let desk = stock(&f, "Desk").await;
        f.favorites.add("buyer", &lamp.id).await.unwrap();
        f.favorites.add("buyer", &desk.id).await.unwrap();

        let list = f.favorites.remove("buyer", &lamp.id).await.unwrap();
        assert_eq!(list, vec![desk]);
    }

    #[tokio::test]
    async fn test_list_skips_deleted_products_in_favorite_order() {
        let f = fixture().await;
        let a = stock(&f, "A").await;
        let b = stock(&f, "B").await;
        let c = stock(&f, "C").await;
        for id in [&c.id, &a.id, &b.id] {
            f.favorites.add("buyer", id).await.unwrap();
        }

        f.products.delete(&a.id).await.unwrap();

        let list = f.favorites.list("buyer").await.unwrap();
        assert_eq!(list, vec![c, b]);
        // The dangling id stays stored; it is only filtered on read.
        let stored = f.users.find_user_by_id("buyer").await.unwrap().unwrap();
        assert_eq!(stored.favorites.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_user_is_unauthenticated() {
        let f = fixture().await;
        let err = f.favorites.list("ghost").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Unauthenticated(_))
        ));
    }
}
