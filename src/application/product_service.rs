use crate::domain::access::{Capability, authorize};
use crate::domain::error::DomainError;
use crate::domain::product::{
    DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, Product, ProductDraft, ProductFilter, ProductListQuery,
    ProductPage, ProductUpdatePolicy,
};
use crate::domain::repository::ProductRepository;
use crate::domain::user::User;
use crate::domain::validation::{ValidationErrors, validate_new_product, validate_product_patch};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    update_policy: ProductUpdatePolicy,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>, update_policy: ProductUpdatePolicy) -> Self {
        Self {
            repository,
            update_policy,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: ProductListQuery) -> Result<ProductPage> {
        let page = query.page.unwrap_or(DEFAULT_PAGE);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        let mut errors = ValidationErrors::new();
        if page == 0 {
            errors.push("page", "must be at least 1");
        }
        if limit == 0 {
            errors.push("limit", "must be at least 1");
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors).into());
        }

        let filter = ProductFilter {
            title_contains: query.search.filter(|s| !s.is_empty()),
            skip: (page as usize - 1).saturating_mul(limit as usize),
            limit: limit as usize,
        };
        let slice = self.repository.find_page(&filter).await?;
        let total_pages = (slice.total as u64).div_ceil(limit as u64);

        debug!(
            total = slice.total,
            total_pages = total_pages,
            returned = slice.items.len(),
            "Products listed"
        );
        Ok(ProductPage {
            products: slice.items,
            total_pages,
            current_page: page,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Product not found".to_string()).into())
    }

    #[instrument(skip(self, seller, draft), fields(seller_id = %seller.id))]
    pub async fn create(&self, seller: &User, draft: ProductDraft) -> Result<Product> {
        let fields = validate_new_product(draft).map_err(|errors| {
            warn!(errors = %errors, "Rejected product");
            DomainError::Validation(errors)
        })?;

        let product = Product::new(fields, Some(seller.id.clone()));
        self.repository.insert(product.clone()).await?;
        info!(product_id = %product.id, title = %product.title, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, editor, draft), fields(editor_id = %editor.id))]
    pub async fn update(&self, editor: &User, id: &str, draft: ProductDraft) -> Result<Product> {
        let patch = validate_product_patch(draft).map_err(DomainError::Validation)?;
        let mut product = self.get(id).await?;

        if self.update_policy == ProductUpdatePolicy::OwnerOrAdmin
            && product.seller.as_deref() != Some(editor.id.as_str())
        {
            authorize(editor, Capability::ManageAnyProduct)?;
        }

        product.apply(patch);
        if !self.repository.update(product.clone()).await? {
            // Deleted between the read and the write.
            return Err(DomainError::NotFound("Product not found".to_string()).into());
        }
        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    #[instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn delete(&self, caller: &User, id: &str) -> Result<Product> {
        authorize(caller, Capability::DeleteProduct).inspect_err(|_| {
            warn!(role = %caller.role, "Non-admin attempted product deletion");
        })?;

        let removed = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Product not found".to_string()))?;
        info!(product_id = %removed.id, title = %removed.title, "Product deleted");
        Ok(removed)
    }

    pub fn update_policy(&self) -> ProductUpdatePolicy {
        self.update_policy
    }
}
