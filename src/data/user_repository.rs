use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{Role, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn save_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        // Unique index on email, checked under the same lock as the insert.
        if storage.values().any(|u| u.email == user.email) {
            warn!(email = %user.email, "Rejecting duplicate email");
            return Err(DomainError::DuplicateEmail.into());
        }
        storage.insert(user.id.clone(), user.clone());
        debug!(
            user_id = %user.id,
            email = %user.email,
            "User saved to memory storage"
        );
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update_user(&self, user: User) -> Result<()> {
        let mut storage = self.storage.write().await;
        if !storage.contains_key(&user.id) {
            return Err(DomainError::NotFound(format!("User not found: {}", user.id)).into());
        }
        trace!(favorites = user.favorites.len(), "Replacing user record");
        storage.insert(user.id.clone(), user);
        Ok(())
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, "User found in storage"),
            None => trace!(email = email, "User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.get(id).cloned();
        if user.is_none() {
            trace!(user_id = id, "User not found in storage");
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email, role = %role))]
    async fn set_role(&self, email: &str, role: Role) -> Result<Option<User>> {
        let mut storage = self.storage.write().await;
        let Some(user) = storage.values_mut().find(|u| u.email == email) else {
            return Ok(None);
        };
        user.role = role;
        user.updated_at = Utc::now();
        debug!(user_id = %user.id, "User role changed");
        Ok(Some(user.clone()))
    }
}
