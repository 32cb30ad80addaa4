use crate::application::auth_service::AuthService;
use crate::application::favorites_service::FavoritesService;
use crate::application::product_service::ProductService;
use crate::data::product_repository::InMemoryProductRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::product::ProductUpdatePolicy;
use crate::domain::validation::ValidationErrors;
use crate::presentation::auth::{login, me, register};
use crate::presentation::favorites::{add_favorite, list_favorites, remove_favorite};
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::products::{
    create_product, delete_product, get_product, list_products, update_product,
};
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

pub struct AppState {
    pub user_repository: Arc<InMemoryUserRepository>,
    pub product_repository: Arc<InMemoryProductRepository>,
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub product_service: ProductService<InMemoryProductRepository>,
    pub favorites_service: FavoritesService<InMemoryUserRepository, InMemoryProductRepository>,
}

impl AppState {
    pub fn in_memory(
        jwt_secret: String,
        token_ttl: Option<Duration>,
        update_policy: ProductUpdatePolicy,
    ) -> Self {
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let product_repository = Arc::new(InMemoryProductRepository::new());
        Self {
            auth_service: Arc::new(AuthService::new(
                user_repository.clone(),
                jwt_secret,
                token_ttl,
            )),
            product_service: ProductService::new(product_repository.clone(), update_policy),
            favorites_service: FavoritesService::new(
                user_repository.clone(),
                product_repository.clone(),
            ),
            user_repository,
            product_repository,
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Please authenticate.")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl MarketError {
    pub fn bad_request(message: &str) -> Self {
        MarketError::BadRequest(message.to_string())
    }

    pub fn internal(message: &str) -> Self {
        MarketError::Internal(message.to_string())
    }

    /// Maps a service failure to its HTTP error. Anything that is not a
    /// domain error is logged and replaced by `fallback`, so storage details
    /// never reach the client.
    pub fn from_failure(err: anyhow::Error, fallback: MarketError) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(errors)) => MarketError::Validation(errors.clone()),
            Some(DomainError::DuplicateEmail) => MarketError::DuplicateEmail,
            Some(DomainError::InvalidCredentials) => MarketError::InvalidCredentials,
            Some(DomainError::Unauthenticated(reason)) => {
                debug!(reason = %reason, "Unauthenticated");
                MarketError::Unauthenticated
            }
            Some(DomainError::Forbidden(msg)) => MarketError::Forbidden(msg.clone()),
            Some(DomainError::NotFound(msg)) => MarketError::NotFound(msg.clone()),
            Some(DomainError::Internal(_)) | None => {
                error!(error = %err, fallback = %fallback, "Request failed");
                fallback
            }
        }
    }
}

impl From<anyhow::Error> for MarketError {
    fn from(err: anyhow::Error) -> Self {
        MarketError::from_failure(err, MarketError::internal("Internal server error"))
    }
}

impl ResponseError for MarketError {
    fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketError::DuplicateEmail => StatusCode::BAD_REQUEST,
            MarketError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            MarketError::Unauthenticated => StatusCode::UNAUTHORIZED,
            MarketError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        if status.is_server_error() {
            error!(error = %error_msg, status = %status, "Server error");
        } else {
            warn!(error = %error_msg, status = %status, "Client error");
        }

        let details = match self {
            MarketError::Validation(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_msg,
            details,
        })
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = MarketError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move { user.ok_or(MarketError::Unauthenticated) })
    }
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "Rejected request body");
        MarketError::bad_request("Invalid request body").into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "Rejected query string");
        MarketError::bad_request("Invalid query parameters").into()
    })
}

/// Registers every endpoint. Authentication is enforced by `JwtAuthMiddleware`,
/// which must wrap the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(register))
                .route("/login", web::post().to(login))
                .route("/me", web::get().to(me)),
        )
        .service(
            web::resource("/products")
                .route(web::get().to(list_products))
                .route(web::post().to(create_product)),
        )
        .service(
            web::resource("/products/{id}")
                .route(web::get().to(get_product))
                .route(web::put().to(update_product))
                .route(web::delete().to(delete_product)),
        )
        .service(web::resource("/favorites").route(web::get().to(list_favorites)))
        .service(
            web::resource("/favorites/{product_id}")
                .route(web::post().to(add_favorite))
                .route(web::delete().to(remove_favorite)),
        );
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    debug!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
