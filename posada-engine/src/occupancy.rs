//! Occupancy Tracker - hotel stays and folio accounting
//!
//! A stay opens against one or more rooms, accumulates charges and
//! payments on its folio, and closes at check-out. Check-out with an
//! outstanding balance needs an explicit force flag and is logged.

use crate::bookings::release_status;
use crate::core::error::{EngineError, EngineResult, Entity};
use crate::money::{round2, validate_price};
use crate::store::{Store, StoreError};
use rust_decimal::Decimal;
use shared::event::{EventPayload, LifecycleEvent};
use shared::models::{
    BillPayment, Charge, ChargeKind, OccupancyStatus, ResourceKind, ResourceStatus, RoomOccupy,
};
use shared::util::now_millis;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct OccupancyTracker {
    store: Store,
    event_tx: broadcast::Sender<LifecycleEvent>,
    reservation_lead_minutes: i64,
}

impl OccupancyTracker {
    pub fn new(
        store: Store,
        event_tx: broadcast::Sender<LifecycleEvent>,
        reservation_lead_minutes: i64,
    ) -> Self {
        Self {
            store,
            event_tx,
            reservation_lead_minutes,
        }
    }

    /// Open a stay over one or more rooms. Either every room is
    /// available and gets occupied, or nothing is written.
    pub fn check_in(
        &self,
        customer_id: i64,
        room_ids: Vec<i64>,
        advance: Decimal,
        note: Option<String>,
    ) -> EngineResult<RoomOccupy> {
        if room_ids.is_empty() {
            return Err(EngineError::RoomRequired);
        }
        if advance < Decimal::ZERO {
            return Err(EngineError::InvalidAmount(advance));
        }

        let txn = self.store.begin_write()?;

        for &room_id in &room_ids {
            let resource = self
                .store
                .get_resource_txn(&txn, room_id)?
                .ok_or(EngineError::NotFound {
                    entity: Entity::Resource,
                    id: room_id,
                })?;
            if resource.kind != ResourceKind::Room {
                return Err(EngineError::WrongResourceKind {
                    resource_id: room_id,
                    expected: ResourceKind::Room,
                });
            }
            if !resource.is_available() {
                return Err(EngineError::RoomUnavailable { room_id });
            }
        }

        for &room_id in &room_ids {
            if let Some(mut resource) = self.store.get_resource_txn(&txn, room_id)? {
                resource.status = ResourceStatus::Occupied;
                self.store.put_resource(&txn, &resource)?;
            }
        }

        let id = self.store.next_id(&txn, "occupancy")?;
        let occupancy = RoomOccupy {
            id,
            customer_id,
            room_ids,
            charges: Vec::new(),
            payments: Vec::new(),
            advance: round2(advance),
            status: OccupancyStatus::Active,
            in_time: now_millis(),
            out_time: None,
            note,
        };
        self.store.put_occupancy(&txn, &occupancy)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(
            occupy_id = id,
            customer_id,
            rooms = ?occupancy.room_ids,
            "Occupancy opened"
        );
        let _ = self
            .event_tx
            .send(LifecycleEvent::new(EventPayload::OccupancyOpened {
                occupy_id: id,
                room_ids: occupancy.room_ids.clone(),
            }));
        Ok(occupancy)
    }

    /// Append a folio charge and return the new outstanding balance.
    pub fn add_charge(
        &self,
        occupy_id: i64,
        kind: ChargeKind,
        description: String,
        amount: Decimal,
    ) -> EngineResult<Decimal> {
        validate_price(amount)?;
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount(amount));
        }

        let txn = self.store.begin_write()?;
        let mut occupancy = self.require_active_txn(&txn, occupy_id)?;

        let charge = Charge {
            id: occupancy.charges.len() as i64 + 1,
            kind,
            description,
            amount: round2(amount),
            at: now_millis(),
        };
        occupancy.charges.push(charge);
        self.store.put_occupancy(&txn, &occupancy)?;
        txn.commit().map_err(StoreError::from)?;

        let balance = round2(occupancy.balance());
        tracing::debug!(occupy_id, kind = ?kind, %amount, %balance, "Charge added");
        let _ = self.event_tx.send(LifecycleEvent::new(EventPayload::ChargeAdded {
            occupy_id,
            kind,
            amount: round2(amount),
        }));
        Ok(balance)
    }

    /// Record a payment against the folio.
    pub fn record_bill_payment(
        &self,
        occupy_id: i64,
        method: String,
        amount: Decimal,
    ) -> EngineResult<Decimal> {
        validate_price(amount)?;
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount(amount));
        }

        let txn = self.store.begin_write()?;
        let mut occupancy = self.require_active_txn(&txn, occupy_id)?;

        occupancy.payments.push(BillPayment {
            method,
            amount: round2(amount),
            at: now_millis(),
        });
        self.store.put_occupancy(&txn, &occupancy)?;
        txn.commit().map_err(StoreError::from)?;

        let balance = round2(occupancy.balance());
        tracing::debug!(occupy_id, %amount, %balance, "Bill payment recorded");
        Ok(balance)
    }

    pub fn balance(&self, occupy_id: i64) -> EngineResult<Decimal> {
        let occupancy = self.find(occupy_id)?;
        Ok(round2(occupancy.balance()))
    }

    /// Close a stay. A positive outstanding balance blocks the
    /// check-out unless `force` is set; forcing is logged with the
    /// balance being written off.
    pub fn check_out(&self, occupy_id: i64, force: bool) -> EngineResult<RoomOccupy> {
        let txn = self.store.begin_write()?;
        let mut occupancy = self.require_active_txn(&txn, occupy_id)?;

        let balance = round2(occupancy.balance());
        if balance > crate::money::MONEY_TOLERANCE {
            if !force {
                return Err(EngineError::OutstandingBalance { occupy_id, balance });
            }
            tracing::warn!(occupy_id, %balance, "Forced check-out with outstanding balance");
        }

        let now = now_millis();
        occupancy.status = OccupancyStatus::CheckedOut;
        occupancy.out_time = Some(now);
        self.store.put_occupancy(&txn, &occupancy)?;

        for &room_id in &occupancy.room_ids {
            if let Some(mut resource) = self.store.get_resource_txn(&txn, room_id)? {
                let peers = self.store.list_bookings_for_resource_txn(&txn, room_id)?;
                resource.status =
                    release_status(&peers, room_id, now, self.reservation_lead_minutes);
                self.store.put_resource(&txn, &resource)?;
            }
        }

        txn.commit().map_err(StoreError::from)?;

        tracing::info!(occupy_id, %balance, force, "Occupancy closed");
        let _ = self
            .event_tx
            .send(LifecycleEvent::new(EventPayload::OccupancyClosed {
                occupy_id,
                balance,
                forced: force,
            }));
        Ok(occupancy)
    }

    pub fn find(&self, occupy_id: i64) -> EngineResult<RoomOccupy> {
        self.store
            .get_occupancy(occupy_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Occupancy,
                id: occupy_id,
            })
    }

    /// The active stay covering a room, if any.
    pub fn active_for_room(&self, room_id: i64) -> EngineResult<Option<RoomOccupy>> {
        Ok(self.store.find_active_occupancy_for_room(room_id)?)
    }

    pub fn list(&self) -> EngineResult<Vec<RoomOccupy>> {
        Ok(self.store.list_occupancies()?)
    }

    fn require_active_txn(
        &self,
        txn: &redb::WriteTransaction,
        occupy_id: i64,
    ) -> EngineResult<RoomOccupy> {
        let occupancy = self
            .store
            .get_occupancy_txn(txn, occupy_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Occupancy,
                id: occupy_id,
            })?;
        if !occupancy.is_active() {
            return Err(EngineError::OccupancyNotActive { occupy_id });
        }
        Ok(occupancy)
    }
}

impl std::fmt::Debug for OccupancyTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupancyTracker")
            .field("reservation_lead_minutes", &self.reservation_lead_minutes)
            .finish_non_exhaustive()
    }
}
