//! Catalog persistence (products and categories)
//!
//! Catalog edits are standalone single-row writes; they never compose
//! with lifecycle transactions, so these methods own their txns.

use super::{CATEGORIES_TABLE, PRODUCTS_TABLE, Store, StoreResult};
use redb::{ReadableDatabase, ReadableTable};
use shared::models::{Category, Product};

impl Store {
    pub fn put_product(&self, product: &Product) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let value = serde_json::to_vec(product)?;
            table.insert(product.id, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn remove_product(&self, id: i64) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            table.remove(id)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn list_products(&self) -> StoreResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        let mut products = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            products.push(serde_json::from_slice(value.value())?);
        }
        Ok(products)
    }

    pub fn put_category(&self, category: &Category) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;
            let value = serde_json::to_vec(category)?;
            table.insert(category.id, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORIES_TABLE)?;

        let mut categories = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            categories.push(serde_json::from_slice(value.value())?);
        }
        Ok(categories)
    }
}
