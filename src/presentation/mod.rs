pub mod auth;
pub mod favorites;
pub mod handlers;
pub mod middleware;
pub mod products;
