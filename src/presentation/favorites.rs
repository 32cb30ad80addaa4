use crate::presentation::handlers::{AppState, MarketError};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::{debug, instrument};

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn list_favorites(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, MarketError> {
    let favorites = state
        .favorites_service
        .list(&user.0.id)
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::internal("Could not fetch favorites")))?;
    debug!(count = favorites.len(), "Favorites listed");
    Ok(HttpResponse::Ok().json(favorites))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id, product_id = %*path))]
pub async fn add_favorite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, MarketError> {
    let favorites = state
        .favorites_service
        .add(&user.0.id, &path)
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::bad_request("Could not add to favorites")))?;
    Ok(HttpResponse::Ok().json(favorites))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id, product_id = %*path))]
pub async fn remove_favorite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, MarketError> {
    let favorites = state
        .favorites_service
        .remove(&user.0.id, &path)
        .await
        .map_err(|e| {
            MarketError::from_failure(e, MarketError::bad_request("Could not remove from favorites"))
        })?;
    Ok(HttpResponse::Ok().json(favorites))
}
