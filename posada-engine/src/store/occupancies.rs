//! Occupancy persistence

use super::{OCCUPANCIES_TABLE, Store, StoreResult};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use shared::models::RoomOccupy;

impl Store {
    pub fn put_occupancy(&self, txn: &WriteTransaction, occupancy: &RoomOccupy) -> StoreResult<()> {
        let mut table = txn.open_table(OCCUPANCIES_TABLE)?;
        let value = serde_json::to_vec(occupancy)?;
        table.insert(occupancy.id, value.as_slice())?;
        Ok(())
    }

    pub fn get_occupancy_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> StoreResult<Option<RoomOccupy>> {
        let table = txn.open_table(OCCUPANCIES_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_occupancy(&self, id: i64) -> StoreResult<Option<RoomOccupy>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OCCUPANCIES_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// The active stay covering a room, if any (within transaction).
    /// Room-service orders resolve their folio through this.
    pub fn find_active_occupancy_for_room_txn(
        &self,
        txn: &WriteTransaction,
        room_id: i64,
    ) -> StoreResult<Option<RoomOccupy>> {
        let table = txn.open_table(OCCUPANCIES_TABLE)?;
        for result in table.iter()? {
            let (_key, value) = result?;
            let occupancy: RoomOccupy = serde_json::from_slice(value.value())?;
            if occupancy.is_active() && occupancy.room_ids.contains(&room_id) {
                return Ok(Some(occupancy));
            }
        }
        Ok(None)
    }

    pub fn find_active_occupancy_for_room(&self, room_id: i64) -> StoreResult<Option<RoomOccupy>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OCCUPANCIES_TABLE)?;
        for result in table.iter()? {
            let (_key, value) = result?;
            let occupancy: RoomOccupy = serde_json::from_slice(value.value())?;
            if occupancy.is_active() && occupancy.room_ids.contains(&room_id) {
                return Ok(Some(occupancy));
            }
        }
        Ok(None)
    }

    pub fn list_occupancies(&self) -> StoreResult<Vec<RoomOccupy>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OCCUPANCIES_TABLE)?;

        let mut occupancies = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            occupancies.push(serde_json::from_slice(value.value())?);
        }
        Ok(occupancies)
    }
}
