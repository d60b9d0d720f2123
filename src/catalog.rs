//! Product Catalog
//!
//! In-memory stand-in for the product store and product data client that sit
//! behind the cache. Serves cache misses and the cache's sync refreshes.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::cache::RecordId;
use crate::error::{CacheError, Result};
use crate::models::ProductRecord;

/// Authoritative product records.
#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: RwLock<HashMap<RecordId, ProductRecord>>,
}

impl ProductCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding `products`.
    pub fn with_products(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        Self {
            products: RwLock::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Looks up a product by id.
    pub async fn fetch(&self, id: RecordId) -> Result<ProductRecord> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CacheError::NotFound(id))
    }

    /// Inserts or replaces a product.
    pub async fn upsert(&self, product: ProductRecord) {
        self.products.write().await.insert(product.id, product);
    }

    /// Returns the number of products held.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }
}
