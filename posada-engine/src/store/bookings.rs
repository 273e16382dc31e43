//! Booking persistence

use super::{BOOKINGS_TABLE, Store, StoreResult};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use shared::models::Booking;

impl Store {
    pub fn put_booking(&self, txn: &WriteTransaction, booking: &Booking) -> StoreResult<()> {
        let mut table = txn.open_table(BOOKINGS_TABLE)?;
        let value = serde_json::to_vec(booking)?;
        table.insert(booking.id, value.as_slice())?;
        Ok(())
    }

    pub fn get_booking_txn(&self, txn: &WriteTransaction, id: i64) -> StoreResult<Option<Booking>> {
        let table = txn.open_table(BOOKINGS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_booking(&self, id: i64) -> StoreResult<Option<Booking>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BOOKINGS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Bookings for one resource (within transaction). The overlap
    /// check runs against this inside the insert's own transaction.
    pub fn list_bookings_for_resource_txn(
        &self,
        txn: &WriteTransaction,
        resource_id: i64,
    ) -> StoreResult<Vec<Booking>> {
        let table = txn.open_table(BOOKINGS_TABLE)?;

        let mut bookings = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let booking: Booking = serde_json::from_slice(value.value())?;
            if booking.resource_id == resource_id {
                bookings.push(booking);
            }
        }
        Ok(bookings)
    }

    pub fn list_bookings_for_resource(&self, resource_id: i64) -> StoreResult<Vec<Booking>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BOOKINGS_TABLE)?;

        let mut bookings = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let booking: Booking = serde_json::from_slice(value.value())?;
            if booking.resource_id == resource_id {
                bookings.push(booking);
            }
        }
        Ok(bookings)
    }

    pub fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BOOKINGS_TABLE)?;

        let mut bookings = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            bookings.push(serde_json::from_slice(value.value())?);
        }
        Ok(bookings)
    }
}
