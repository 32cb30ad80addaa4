pub mod access;
pub mod error;
pub mod product;
pub mod repository;
pub mod user;
pub mod validation;
