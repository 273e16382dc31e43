//! Sale persistence - append-only settlement records

use super::{SALES_TABLE, Store, StoreResult};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use shared::models::Sale;

impl Store {
    /// Append a sale. There is deliberately no update or remove.
    pub fn store_sale(&self, txn: &WriteTransaction, sale: &Sale) -> StoreResult<()> {
        let mut table = txn.open_table(SALES_TABLE)?;
        let value = serde_json::to_vec(sale)?;
        table.insert(sale.id, value.as_slice())?;
        Ok(())
    }

    pub fn get_sale(&self, id: i64) -> StoreResult<Option<Sale>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SALES_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn find_sale_by_receipt(&self, receipt_number: &str) -> StoreResult<Option<Sale>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SALES_TABLE)?;
        for result in table.iter()? {
            let (_key, value) = result?;
            let sale: Sale = serde_json::from_slice(value.value())?;
            if sale.receipt_number == receipt_number {
                return Ok(Some(sale));
            }
        }
        Ok(None)
    }

    pub fn find_sale_for_order(&self, order_id: i64) -> StoreResult<Option<Sale>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SALES_TABLE)?;
        for result in table.iter()? {
            let (_key, value) = result?;
            let sale: Sale = serde_json::from_slice(value.value())?;
            if sale.order_id == order_id {
                return Ok(Some(sale));
            }
        }
        Ok(None)
    }

    /// Sales settled inside `[from_millis, to_millis)`.
    pub fn list_sales_in_range(&self, from_millis: i64, to_millis: i64) -> StoreResult<Vec<Sale>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SALES_TABLE)?;

        let mut sales = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let sale: Sale = serde_json::from_slice(value.value())?;
            if sale.settled_at >= from_millis && sale.settled_at < to_millis {
                sales.push(sale);
            }
        }
        Ok(sales)
    }
}
