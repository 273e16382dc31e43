//! Booking Manager - reservations for tables and rooms
//!
//! Overlap checks run inside the same write transaction as the
//! insert; redb's single-writer model makes the read-then-write
//! race-free under concurrent callers.

use crate::core::error::{EngineError, EngineResult, Entity};
use crate::store::{Store, StoreError};
use shared::event::{EventPayload, LifecycleEvent};
use shared::models::{Booking, BookingCreate, BookingStatus, Resource, ResourceStatus};
use shared::util::now_millis;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct BookingManager {
    store: Store,
    event_tx: broadcast::Sender<LifecycleEvent>,
    reservation_lead_minutes: i64,
}

/// Legal status edges: pending -> confirmed -> checked_in -> completed,
/// plus cancelled/no_show from any non-terminal state.
fn transition_allowed(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Pending, Cancelled)
            | (Pending, NoShow)
            | (Confirmed, CheckedIn)
            | (Confirmed, Cancelled)
            | (Confirmed, NoShow)
            | (CheckedIn, Completed)
            | (CheckedIn, Cancelled)
            | (CheckedIn, NoShow)
    )
}

/// Status a resource should take when freed: Reserved when a blocking
/// booking starts within the lead window, Available otherwise.
pub(crate) fn release_status(
    bookings: &[Booking],
    resource_id: i64,
    now: i64,
    lead_minutes: i64,
) -> ResourceStatus {
    let lead_millis = lead_minutes * 60_000;
    let claimed = bookings.iter().any(|b| {
        b.resource_id == resource_id
            && b.status.blocks_window()
            && b.status != BookingStatus::CheckedIn
            && b.window.end_at > now
            && b.window.start_at <= now + lead_millis
    });
    if claimed {
        ResourceStatus::Reserved
    } else {
        ResourceStatus::Available
    }
}

impl BookingManager {
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

    /// Create a booking for a future window. Validates the window,
    /// the party size against resource capacity, and the absence of an
    /// overlapping non-cancelled booking on the same resource.
    pub fn create(&self, payload: BookingCreate) -> EngineResult<Booking> {
        if !payload.window.is_valid() {
            return Err(EngineError::InvalidWindow);
        }
        if payload.party_size <= 0 {
            return Err(EngineError::InvalidGuestCount(payload.party_size));
        }

        let txn = self.store.begin_write()?;

        let resource: Resource = self
            .store
            .get_resource_txn(&txn, payload.resource_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Resource,
                id: payload.resource_id,
            })?;

        if payload.party_size > resource.capacity {
            return Err(EngineError::OverCapacity {
                resource_id: resource.id,
                capacity: resource.capacity,
                party_size: payload.party_size,
            });
        }

        let existing = self
            .store
            .list_bookings_for_resource_txn(&txn, payload.resource_id)?;
        if let Some(blocker) = existing
            .iter()
            .find(|b| b.status.blocks_window() && b.window.overlaps(&payload.window))
        {
            return Err(EngineError::BookingOverlap {
                resource_id: payload.resource_id,
                booking_id: blocker.id,
            });
        }

        let now = now_millis();
        let id = self.store.next_id(&txn, "booking")?;
        let booking = Booking {
            id,
            resource_id: payload.resource_id,
            customer_id: payload.customer_id,
            party_size: payload.party_size,
            window: payload.window,
            status: BookingStatus::Pending,
            note: payload.note,
            created_at: now,
            updated_at: now,
        };
        self.store.put_booking(&txn, &booking)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(
            booking_id = id,
            resource_id = booking.resource_id,
            party_size = booking.party_size,
            "Booking created"
        );
        let _ = self.event_tx.send(LifecycleEvent::new(EventPayload::BookingCreated {
            booking_id: id,
            resource_id: booking.resource_id,
        }));
        Ok(booking)
    }

    /// Drive a booking along its status machine. Checking in marks the
    /// resource occupied; leaving the checked-in state releases it.
    pub fn update_status(&self, booking_id: i64, new_status: BookingStatus) -> EngineResult<Booking> {
        let txn = self.store.begin_write()?;

        let mut booking = self
            .store
            .get_booking_txn(&txn, booking_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Booking,
                id: booking_id,
            })?;

        if !transition_allowed(booking.status, new_status) {
            return Err(EngineError::BookingTransition {
                booking_id,
                from: booking.status,
                to: new_status,
            });
        }

        let was_checked_in = booking.status == BookingStatus::CheckedIn;
        booking.status = new_status;
        booking.updated_at = now_millis();
        self.store.put_booking(&txn, &booking)?;

        if let Some(mut resource) = self.store.get_resource_txn(&txn, booking.resource_id)? {
            if new_status == BookingStatus::CheckedIn {
                resource.status = ResourceStatus::Occupied;
                self.store.put_resource(&txn, &resource)?;
            } else if was_checked_in {
                let peers = self
                    .store
                    .list_bookings_for_resource_txn(&txn, booking.resource_id)?;
                resource.status = release_status(
                    &peers,
                    booking.resource_id,
                    now_millis(),
                    self.reservation_lead_minutes,
                );
                self.store.put_resource(&txn, &resource)?;
            }
        }

        txn.commit().map_err(StoreError::from)?;

        tracing::info!(booking_id, status = ?new_status, "Booking status updated");
        let _ = self
            .event_tx
            .send(LifecycleEvent::new(EventPayload::BookingStatusChanged {
                booking_id,
                status: new_status,
            }));
        Ok(booking)
    }

    pub fn cancel(&self, booking_id: i64) -> EngineResult<Booking> {
        self.update_status(booking_id, BookingStatus::Cancelled)
    }

    pub fn find(&self, booking_id: i64) -> EngineResult<Booking> {
        self.store
            .get_booking(booking_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Booking,
                id: booking_id,
            })
    }

    pub fn list_for_resource(&self, resource_id: i64) -> EngineResult<Vec<Booking>> {
        Ok(self.store.list_bookings_for_resource(resource_id)?)
    }

    /// Bookings still able to block a window.
    pub fn list_active(&self) -> EngineResult<Vec<Booking>> {
        Ok(self
            .store
            .list_bookings()?
            .into_iter()
            .filter(|b| b.status.blocks_window())
            .collect())
    }
}

impl std::fmt::Debug for BookingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingManager")
            .field("reservation_lead_minutes", &self.reservation_lead_minutes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{BookingWindow, ResourceCreate, ResourceKind};

    const HOUR: i64 = 3_600_000;

    fn setup() -> (BookingManager, Store, i64) {
        let store = Store::open_in_memory().unwrap();
        let (event_tx, _) = broadcast::channel(16);
        let manager = BookingManager::new(store.clone(), event_tx, 120);

        let registry = crate::locations::LocationRegistry::new(store.clone());
        let table = registry
            .register(ResourceCreate {
                kind: ResourceKind::Table,
                name: "T5".to_string(),
                capacity: 6,
                rate: None,
            })
            .unwrap();
        (manager, store, table.id)
    }

    fn create(manager: &BookingManager, resource_id: i64, start_h: i64, end_h: i64) -> EngineResult<Booking> {
        manager.create(BookingCreate {
            resource_id,
            customer_id: 1,
            party_size: 4,
            window: BookingWindow::new(start_h * HOUR, end_h * HOUR),
            note: None,
        })
    }

    #[test]
    fn test_create_booking() {
        let (manager, _store, table_id) = setup();
        let booking = create(&manager, table_id, 19, 21).unwrap();
        assert_eq!(booking.id, 1);
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[test]
    fn test_overlapping_booking_rejected() {
        let (manager, _store, table_id) = setup();
        let first = create(&manager, table_id, 19, 21).unwrap();

        // 20:00-22:00 overlaps 19:00-21:00
        let err = create(&manager, table_id, 20, 22).unwrap_err();
        assert!(matches!(
            err,
            EngineError::BookingOverlap { booking_id, .. } if booking_id == first.id
        ));

        // back-to-back 21:00-22:00 is fine
        assert!(create(&manager, table_id, 21, 22).is_ok());
    }

    #[test]
    fn test_cancelled_booking_does_not_block() {
        let (manager, _store, table_id) = setup();
        let first = create(&manager, table_id, 19, 21).unwrap();
        manager.cancel(first.id).unwrap();

        assert!(create(&manager, table_id, 19, 21).is_ok());
    }

    #[test]
    fn test_invalid_window_rejected() {
        let (manager, _store, table_id) = setup();
        let err = create(&manager, table_id, 21, 19).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow));
    }

    #[test]
    fn test_party_size_beyond_capacity() {
        let (manager, _store, table_id) = setup();
        let err = manager
            .create(BookingCreate {
                resource_id: table_id,
                customer_id: 1,
                party_size: 9,
                window: BookingWindow::new(19 * HOUR, 21 * HOUR),
                note: None,
            })
            .unwrap_err();
        assert!(matches!(err, EngineError::OverCapacity { capacity: 6, party_size: 9, .. }));
    }

    #[test]
    fn test_unknown_resource() {
        let (manager, _store, _table_id) = setup();
        let err = create(&manager, 999, 19, 21).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NotFound { entity: Entity::Resource, id: 999 }
        ));
    }

    #[test]
    fn test_transition_chain() {
        let (manager, _store, table_id) = setup();
        let booking = create(&manager, table_id, 19, 21).unwrap();

        manager.update_status(booking.id, BookingStatus::Confirmed).unwrap();
        manager.update_status(booking.id, BookingStatus::CheckedIn).unwrap();
        let done = manager.update_status(booking.id, BookingStatus::Completed).unwrap();
        assert_eq!(done.status, BookingStatus::Completed);
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let (manager, _store, table_id) = setup();
        let booking = create(&manager, table_id, 19, 21).unwrap();

        // pending cannot jump straight to checked_in
        let err = manager
            .update_status(booking.id, BookingStatus::CheckedIn)
            .unwrap_err();
        assert!(matches!(err, EngineError::BookingTransition { .. }));

        // completed is terminal
        manager.update_status(booking.id, BookingStatus::Confirmed).unwrap();
        manager.update_status(booking.id, BookingStatus::CheckedIn).unwrap();
        manager.update_status(booking.id, BookingStatus::Completed).unwrap();
        let err = manager
            .update_status(booking.id, BookingStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, EngineError::BookingTransition { .. }));
    }

    #[test]
    fn test_check_in_occupies_resource_and_complete_releases() {
        let (manager, store, table_id) = setup();
        let booking = create(&manager, table_id, 19, 21).unwrap();

        manager.update_status(booking.id, BookingStatus::Confirmed).unwrap();
        manager.update_status(booking.id, BookingStatus::CheckedIn).unwrap();
        assert_eq!(
            store.get_resource(table_id).unwrap().unwrap().status,
            ResourceStatus::Occupied
        );

        manager.update_status(booking.id, BookingStatus::Completed).unwrap();
        assert_eq!(
            store.get_resource(table_id).unwrap().unwrap().status,
            ResourceStatus::Available
        );
    }

    #[test]
    fn test_release_status_honors_lead_window() {
        let now = 100 * HOUR;
        let soon = Booking {
            id: 1,
            resource_id: 7,
            customer_id: 1,
            party_size: 2,
            window: BookingWindow::new(now + HOUR, now + 3 * HOUR),
            status: BookingStatus::Confirmed,
            note: None,
            created_at: 0,
            updated_at: 0,
        };

        // booking starts within the 120-minute lead window
        assert_eq!(
            release_status(std::slice::from_ref(&soon), 7, now, 120),
            ResourceStatus::Reserved
        );
        // shorter lead window: not claimed yet
        assert_eq!(
            release_status(std::slice::from_ref(&soon), 7, now, 30),
            ResourceStatus::Available
        );
        // other resource: irrelevant
        assert_eq!(
            release_status(std::slice::from_ref(&soon), 8, now, 120),
            ResourceStatus::Available
        );

        let cancelled = Booking {
            status: BookingStatus::Cancelled,
            ..soon
        };
        assert_eq!(
            release_status(&[cancelled], 7, now, 120),
            ResourceStatus::Available
        );
    }
}
