use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{AuthSession, CreateUser, LoginRequest, Role, User};
use crate::domain::validation::{validate_login, validate_registration};
use crate::infrastructure::security::{generate_token, hash_password, validate_token, verify_password};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl: Option<Duration>,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, token_ttl: Option<Duration>) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: CreateUser) -> Result<AuthSession> {
        trace!("Starting user registration");
        validate_registration(&req).map_err(DomainError::from)?;
        let email = req.email.trim().to_string();

        if self.user_repository.find_user_by_email(&email).await?.is_some() {
            warn!(email = %email, "User already exists");
            return Err(DomainError::DuplicateEmail.into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            role: Role::User,
            favorites: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        // The store enforces email uniqueness as well, which covers concurrent
        // registrations that both passed the lookup above.
        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        Ok(AuthSession { user, token })
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthSession> {
        trace!("Starting login");
        if validate_login(&req).is_err() {
            warn!("Login attempted with missing credentials");
            return Err(DomainError::InvalidCredentials.into());
        }

        let user = self
            .user_repository
            .find_user_by_email(req.email.trim())
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::InvalidCredentials
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, user_id = %user.id, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::InvalidCredentials.into());
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, email = %user.email, "Login successful");
        Ok(AuthSession { user, token })
    }

    /// Resolves a bearer token to the user it was issued for.
    #[instrument(skip_all)]
    pub async fn verify(&self, token: &str) -> Result<User> {
        if token.is_empty() {
            return Err(DomainError::Unauthenticated("No token".to_string()).into());
        }

        let user_id = validate_token(token, &self.jwt_secret, self.token_ttl.is_some()).map_err(|e| {
            debug!(error = %e, "Token rejected");
            DomainError::Unauthenticated(format!("Invalid token: {}", e))
        })?;

        self.user_repository
            .find_user_by_id(&user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Token subject no longer exists");
                DomainError::Unauthenticated("User not found".to_string()).into()
            })
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: &str) -> Result<User> {
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("User not found".to_string()).into())
    }

    /// Administrative promotion. Not reachable over HTTP.
    #[instrument(skip(self))]
    pub async fn promote_to_admin(&self, email: &str) -> Result<User> {
        let user = self
            .user_repository
            .set_role(email, Role::Admin)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User with email {} not found", email)))?;
        info!(user_id = %user.id, email = %user.email, "User promoted to admin");
        Ok(user)
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        let token = generate_token(&user.id, &self.jwt_secret, self.token_ttl).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;
        Ok(token)
    }
}
