use crate::domain::user::{AuthSession, CreateUser, LoginRequest, UserProfile};
use crate::presentation::handlers::{AppState, MarketError};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserProfile::from(&session.user),
            token: session.token,
        }
    }
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, MarketError> {
    info!("Registration request received");

    let session = state
        .auth_service
        .register(req.into_inner())
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::bad_request("Registration failed")))?;

    info!(user_id = %session.user.id, "User registered successfully");
    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, MarketError> {
    info!("Login request received");

    let session = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::bad_request("Login failed")))?;

    info!(user_id = %session.user.id, "Login successful");
    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, MarketError> {
    let current = state
        .auth_service
        .current_user(&user.0.id)
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::bad_request("Failed to fetch user")))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(&current)))
}
