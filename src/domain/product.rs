use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub image: String,
    /// Id of the user who listed the product. Seeded catalog entries have none.
    pub seller: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(fields: NewProduct, seller: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            price: fields.price,
            description: fields.description,
            image: fields.image,
            seller,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        self.updated_at = Utc::now();
    }
}

/// Raw product fields as submitted by a client. Any `seller` in the payload is
/// ignored; ownership always comes from the authenticated caller.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: Option<String>,
    pub price: Option<serde_json::Value>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Product fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Store-level filter for a single page of products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub title_contains: Option<String>,
    pub skip: usize,
    pub limit: usize,
}

/// One page of matches plus the total match count, taken from the same snapshot.
#[derive(Debug, Clone)]
pub struct ProductSlice {
    pub items: Vec<Product>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_pages: u64,
    pub current_page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductUpdatePolicy {
    /// Any authenticated caller may edit any product.
    #[default]
    AnyAuthenticated,
    /// Only the seller, or a caller allowed to manage every product.
    OwnerOrAdmin,
}

impl std::str::FromStr for ProductUpdatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any-authenticated" => Ok(ProductUpdatePolicy::AnyAuthenticated),
            "owner-or-admin" => Ok(ProductUpdatePolicy::OwnerOrAdmin),
            other => Err(format!("unknown product update policy: {}", other)),
        }
    }
}
