//! Kitchen ticket persistence

use super::{Store, StoreResult, TICKETS_TABLE};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use shared::models::KitchenTicket;

impl Store {
    pub fn store_ticket(&self, txn: &WriteTransaction, ticket: &KitchenTicket) -> StoreResult<()> {
        let mut table = txn.open_table(TICKETS_TABLE)?;
        let value = serde_json::to_vec(ticket)?;
        table.insert(ticket.id, value.as_slice())?;
        Ok(())
    }

    pub fn get_ticket_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> StoreResult<Option<KitchenTicket>> {
        let table = txn.open_table(TICKETS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_ticket(&self, id: i64) -> StoreResult<Option<KitchenTicket>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TICKETS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_tickets_for_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
    ) -> StoreResult<Vec<KitchenTicket>> {
        let table = txn.open_table(TICKETS_TABLE)?;

        let mut tickets = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let ticket: KitchenTicket = serde_json::from_slice(value.value())?;
            if ticket.order_id == order_id {
                tickets.push(ticket);
            }
        }
        Ok(tickets)
    }

    pub fn list_tickets_for_order(&self, order_id: i64) -> StoreResult<Vec<KitchenTicket>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TICKETS_TABLE)?;

        let mut tickets = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let ticket: KitchenTicket = serde_json::from_slice(value.value())?;
            if ticket.order_id == order_id {
                tickets.push(ticket);
            }
        }
        Ok(tickets)
    }

    /// Sent + Preparing tickets across all orders, for the prep screens.
    pub fn list_open_tickets(&self) -> StoreResult<Vec<KitchenTicket>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TICKETS_TABLE)?;

        let mut tickets = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let ticket: KitchenTicket = serde_json::from_slice(value.value())?;
            if !ticket.status.is_terminal() {
                tickets.push(ticket);
            }
        }
        Ok(tickets)
    }

    /// Explicit cascade used when purging an order.
    pub fn remove_tickets_for_order(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
    ) -> StoreResult<usize> {
        let mut table = txn.open_table(TICKETS_TABLE)?;

        let mut doomed = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            let ticket: KitchenTicket = serde_json::from_slice(value.value())?;
            if ticket.order_id == order_id {
                doomed.push(key.value());
            }
        }
        for id in &doomed {
            table.remove(*id)?;
        }
        Ok(doomed.len())
    }
}
