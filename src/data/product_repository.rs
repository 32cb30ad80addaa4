use crate::domain::product::{Product, ProductFilter, ProductSlice};
use crate::domain::repository::ProductRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Products kept in insertion order, which doubles as the listing order.
#[derive(Clone)]
pub struct InMemoryProductRepository {
    storage: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn title_matches(product: &Product, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => product.title.to_lowercase().contains(needle),
        None => true,
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self), fields(product_id = %product.id, title = %product.title))]
    async fn insert(&self, product: Product) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.push(product);
        debug!(count = storage.len(), "Product saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = id))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let storage = self.storage.read().await;
        Ok(storage.iter().find(|p| p.id == id).cloned())
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn find_many(&self, ids: &[String]) -> Result<Vec<Product>> {
        let storage = self.storage.read().await;
        let found: Vec<Product> = ids
            .iter()
            .filter_map(|id| storage.iter().find(|p| &p.id == id).cloned())
            .collect();
        trace!(resolved = found.len(), "Resolved product references");
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn find_page(&self, filter: &ProductFilter) -> Result<ProductSlice> {
        let needle = filter.title_contains.as_ref().map(|s| s.to_lowercase());
        let storage = self.storage.read().await;
        let matching = storage
            .iter()
            .filter(|p| title_matches(p, needle.as_deref()));
        let total = matching.clone().count();
        let items = matching
            .skip(filter.skip)
            .take(filter.limit)
            .cloned()
            .collect::<Vec<_>>();
        debug!(total = total, returned = items.len(), "Product page assembled");
        Ok(ProductSlice { items, total })
    }

    #[instrument(skip(self), fields(product_id = %product.id))]
    async fn update(&self, product: Product) -> Result<bool> {
        let mut storage = self.storage.write().await;
        match storage.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self), fields(product_id = id))]
    async fn delete(&self, id: &str) -> Result<Option<Product>> {
        let mut storage = self.storage.write().await;
        let removed = storage
            .iter()
            .position(|p| p.id == id)
            .map(|idx| storage.remove(idx));
        if removed.is_some() {
            debug!(remaining = storage.len(), "Product removed from memory storage");
        }
        Ok(removed)
    }
}
