//! API Handlers
//!
//! HTTP request handlers for the product service endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::cache::{ItemCache, RecordId};
use crate::catalog::ProductCatalog;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, ProductRecord, StatsResponse, UpdateProductRequest};
use crate::tasks::sync_fn;

/// Application state shared across all handlers.
///
/// `cache` is `None` when the service runs with the cache disabled.
#[derive(Clone)]
pub struct AppState {
    /// Item cache in front of the catalog
    pub cache: Option<Arc<ItemCache<ProductRecord>>>,
    /// Backing product records
    pub catalog: Arc<ProductCatalog>,
}

impl AppState {
    /// Creates a new AppState serving `catalog` through `cache`.
    pub fn new(cache: ItemCache<ProductRecord>, catalog: Arc<ProductCatalog>) -> Self {
        Self {
            cache: Some(Arc::new(cache)),
            catalog,
        }
    }

    /// Creates a new AppState that serves every request from the catalog.
    pub fn without_cache(catalog: Arc<ProductCatalog>) -> Self {
        Self {
            cache: None,
            catalog,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// When sync is enabled the cache refreshes its records from the catalog.
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &Config, catalog: Arc<ProductCatalog>) -> Self {
        if config.cache.disabled {
            return Self::without_cache(catalog);
        }

        let cache = if config.sync_enabled {
            let source = catalog.clone();
            let refresh = sync_fn(move |id| {
                let source = source.clone();
                async move { source.fetch(id).await.map_err(anyhow::Error::from) }
            });
            ItemCache::with_sync(&config.cache, refresh)
        } else {
            ItemCache::new(&config.cache)
        };
        Self::new(cache, catalog)
    }

    /// Stops the cache's background tasks.
    pub async fn shutdown(&self) {
        if let Some(cache) = &self.cache {
            cache.shutdown().await;
        }
    }
}

/// Handler for GET /product/:id
///
/// Serves from the cache, falling back to the catalog on a miss and caching
/// what the catalog returned.
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<ProductRecord>> {
    let Some(cache) = &state.cache else {
        return Ok(Json(state.catalog.fetch(id).await?));
    };

    if let Some(product) = cache.get(id).await? {
        return Ok(Json(product));
    }

    debug!("Cache miss for product {}, loading from catalog", id);
    let product = state.catalog.fetch(id).await?;
    cache.write(product.clone()).await?;
    Ok(Json(product))
}

/// Handler for PUT /product/:id
///
/// Updates the catalog first, then writes the new record through to the cache.
pub async fn put_product_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductRecord>> {
    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let product = req.into_record(id);
    state.catalog.upsert(product.clone()).await;
    if let Some(cache) = &state.cache {
        cache.write(product.clone()).await?;
    }

    Ok(Json(product))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    match &state.cache {
        Some(cache) => Ok(Json(StatsResponse::new(&cache.stats().await?))),
        None => Ok(Json(StatsResponse::disabled())),
    }
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
