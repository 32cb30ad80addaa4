use crate::domain::product::{Product, ProductFilter, ProductSlice};
use crate::domain::user::{Role, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. Fails with `DomainError::DuplicateEmail` if the email
    /// is already taken.
    async fn save_user(&self, user: User) -> Result<()>;
    /// Replaces a stored user wholesale (last write wins).
    async fn update_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn set_role(&self, email: &str, role: Role) -> Result<Option<User>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: Product) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>>;
    /// Looks up every id in order, skipping ids that no longer resolve.
    async fn find_many(&self, ids: &[String]) -> Result<Vec<Product>>;
    async fn find_page(&self, filter: &ProductFilter) -> Result<ProductSlice>;
    async fn update(&self, product: Product) -> Result<bool>;
    async fn delete(&self, id: &str) -> Result<Option<Product>>;
}
