//! Catalog Service - product and category lookups with in-memory caching
//!
//! Write-through cache over the store. Order actions read it on their
//! hot path (`require_sellable`), so lookups never touch disk; edits
//! are rare and pay the storage write.

use crate::core::error::{EngineError, EngineResult, Entity};
use crate::money;
use crate::store::Store;
use parking_lot::RwLock;
use shared::models::{Category, Product};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogService {
    store: Store,
    products: Arc<RwLock<HashMap<i64, Product>>>,
    categories: Arc<RwLock<HashMap<i64, Category>>>,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            products: Arc::new(RwLock::new(HashMap::new())),
            categories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fill the cache from the store. Called once at engine startup.
    pub fn warmup(&self) -> EngineResult<()> {
        let products = self.store.list_products()?;
        let categories = self.store.list_categories()?;

        let mut product_cache = self.products.write();
        product_cache.clear();
        for product in products {
            product_cache.insert(product.id, product);
        }
        let product_count = product_cache.len();
        drop(product_cache);

        let mut category_cache = self.categories.write();
        category_cache.clear();
        for category in categories {
            category_cache.insert(category.id, category);
        }
        let category_count = category_cache.len();
        drop(category_cache);

        tracing::info!(
            "📦 CatalogService: loaded {} products, {} categories",
            product_count,
            category_count
        );
        Ok(())
    }

    /// Bulk replace the catalog (store + cache). Used by hosts syncing
    /// reference data from an upstream system.
    pub fn load(&self, products: Vec<Product>, categories: Vec<Category>) -> EngineResult<()> {
        for product in &products {
            money::validate_price(product.price)?;
            self.store.put_product(product)?;
        }
        for category in &categories {
            self.store.put_category(category)?;
        }
        self.warmup()
    }

    // ========== Edits ==========

    pub fn upsert_product(&self, product: Product) -> EngineResult<()> {
        money::validate_price(product.price)?;
        self.store.put_product(&product)?;
        self.products.write().insert(product.id, product);
        Ok(())
    }

    pub fn remove_product(&self, id: i64) -> EngineResult<()> {
        self.store.remove_product(id)?;
        self.products.write().remove(&id);
        Ok(())
    }

    pub fn upsert_category(&self, category: Category) -> EngineResult<()> {
        self.store.put_category(&category)?;
        self.categories.write().insert(category.id, category);
        Ok(())
    }

    // ========== Lookups ==========

    pub fn get_product(&self, id: i64) -> EngineResult<Product> {
        self.products
            .read()
            .get(&id)
            .cloned()
            .ok_or(EngineError::NotFound {
                entity: Entity::Product,
                id,
            })
    }

    pub fn get_products_batch(&self, ids: &[i64]) -> EngineResult<Vec<Product>> {
        let cache = self.products.read();
        let mut products = Vec::with_capacity(ids.len());
        for id in ids {
            let product = cache.get(id).cloned().ok_or(EngineError::NotFound {
                entity: Entity::Product,
                id: *id,
            })?;
            products.push(product);
        }
        Ok(products)
    }

    /// Active-status gate used at order time.
    pub fn require_sellable(&self, id: i64) -> EngineResult<Product> {
        let product = self.get_product(id)?;
        if !product.is_sellable() {
            return Err(EngineError::ProductNotSellable { product_id: id });
        }
        Ok(product)
    }

    pub fn get_category(&self, id: i64) -> Option<Category> {
        self.categories.read().get(&id).cloned()
    }

    pub fn list_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.read().values().cloned().collect();
        products.sort_by_key(|p| p.id);
        products
    }

    pub fn products_by_category(&self, category_id: i64) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .values()
            .filter(|p| p.category_id == Some(category_id))
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id);
        products
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("products", &self.products.read().len())
            .field("categories", &self.categories.read().len())
            .finish()
    }
}
