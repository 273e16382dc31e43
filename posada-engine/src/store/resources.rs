//! Resource persistence (tables and rooms)

use super::{RESOURCES_TABLE, Store, StoreResult};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use shared::models::Resource;

impl Store {
    /// Insert or replace a resource (within transaction).
    pub fn put_resource(&self, txn: &WriteTransaction, resource: &Resource) -> StoreResult<()> {
        let mut table = txn.open_table(RESOURCES_TABLE)?;
        let value = serde_json::to_vec(resource)?;
        table.insert(resource.id, value.as_slice())?;
        Ok(())
    }

    /// Get a resource by id (within transaction).
    pub fn get_resource_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> StoreResult<Option<Resource>> {
        let table = txn.open_table(RESOURCES_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a resource by id (read-only).
    pub fn get_resource(&self, id: i64) -> StoreResult<Option<Resource>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESOURCES_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All resources in id order.
    pub fn list_resources(&self) -> StoreResult<Vec<Resource>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESOURCES_TABLE)?;

        let mut resources = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            resources.push(serde_json::from_slice(value.value())?);
        }
        Ok(resources)
    }
}
