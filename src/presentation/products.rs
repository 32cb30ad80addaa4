use crate::domain::product::{ProductDraft, ProductListQuery};
use crate::presentation::handlers::{AppState, MarketError};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[instrument(skip(state))]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, MarketError> {
    let page = state
        .product_service
        .list(query.into_inner())
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::internal("Could not fetch products")))?;
    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(state), fields(product_id = %*path))]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, MarketError> {
    let product = state
        .product_service
        .get(&path)
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::internal("Could not fetch product")))?;
    Ok(HttpResponse::Ok().json(product))
}

#[instrument(skip(state, user, req), fields(user_id = %user.0.id, product_id))]
pub async fn create_product(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ProductDraft>,
) -> Result<HttpResponse, MarketError> {
    let product = state
        .product_service
        .create(&user.0, req.into_inner())
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::bad_request("Could not create product")))?;

    tracing::Span::current().record("product_id", product.id.as_str());
    info!(title = %product.title, price = product.price, "Product listed");
    Ok(HttpResponse::Created().json(product))
}

#[instrument(skip(state, user, req), fields(user_id = %user.0.id, product_id = %*path))]
pub async fn update_product(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<ProductDraft>,
) -> Result<HttpResponse, MarketError> {
    let product = state
        .product_service
        .update(&user.0, &path, req.into_inner())
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::bad_request("Could not update product")))?;
    Ok(HttpResponse::Ok().json(product))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id, product_id = %*path))]
pub async fn delete_product(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, MarketError> {
    state
        .product_service
        .delete(&user.0, &path)
        .await
        .map_err(|e| MarketError::from_failure(e, MarketError::internal("Could not delete product")))?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Product deleted".to_string(),
    }))
}
