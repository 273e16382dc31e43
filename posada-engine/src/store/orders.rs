//! Order persistence and the open-order index

use super::{ACTIVE_ORDERS_TABLE, ORDERS_TABLE, Store, StoreResult};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use shared::order::OrderSnapshot;

impl Store {
    pub fn store_order(&self, txn: &WriteTransaction, snapshot: &OrderSnapshot) -> StoreResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(snapshot)?;
        table.insert(snapshot.id, value.as_slice())?;
        Ok(())
    }

    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> StoreResult<Option<OrderSnapshot>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_order(&self, id: i64) -> StoreResult<Option<OrderSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Membership in the index means the order is Pending or Held.
    pub fn mark_order_active(&self, txn: &WriteTransaction, id: i64) -> StoreResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.insert(id, ())?;
        Ok(())
    }

    pub fn mark_order_inactive(&self, txn: &WriteTransaction, id: i64) -> StoreResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.remove(id)?;
        Ok(())
    }

    pub fn get_active_order_ids(&self) -> StoreResult<Vec<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;

        let mut ids = Vec::new();
        for result in table.iter()? {
            let (key, _value) = result?;
            ids.push(key.value());
        }
        Ok(ids)
    }

    pub fn get_active_orders(&self) -> StoreResult<Vec<OrderSnapshot>> {
        let ids = self.get_active_order_ids()?;
        let mut snapshots = Vec::new();
        for id in ids {
            if let Some(snapshot) = self.get_order(id)? {
                snapshots.push(snapshot);
            }
        }
        Ok(snapshots)
    }

    /// The open order occupying a table, if any (within transaction).
    pub fn find_active_order_for_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
    ) -> StoreResult<Option<i64>> {
        let active_table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let orders_table = txn.open_table(ORDERS_TABLE)?;

        for result in active_table.iter()? {
            let (key, _) = result?;
            let order_id = key.value();

            if let Some(value) = orders_table.get(order_id)? {
                let snapshot: OrderSnapshot = serde_json::from_slice(value.value())?;
                if snapshot.table_id == Some(table_id) {
                    return Ok(Some(order_id));
                }
            }
        }
        Ok(None)
    }

    pub fn get_all_orders(&self) -> StoreResult<Vec<OrderSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut snapshots = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            snapshots.push(serde_json::from_slice(value.value())?);
        }
        Ok(snapshots)
    }

    /// Remove the order row itself. Lines live inside the snapshot;
    /// tickets are removed separately by the purge step.
    pub fn remove_order(&self, txn: &WriteTransaction, id: i64) -> StoreResult<()> {
        let mut orders = txn.open_table(ORDERS_TABLE)?;
        orders.remove(id)?;
        drop(orders);
        let mut active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        active.remove(id)?;
        Ok(())
    }
}
