//! Location Registry - dining tables and guest rooms
//!
//! Pure state holder for physical resources. The registry validates
//! nothing beyond enum validity; the workflow modules (bookings,
//! occupancy, orders) decide when a status may change and write it
//! inside their own transactions through the store's txn-scoped
//! methods.

use crate::core::error::{EngineError, EngineResult, Entity};
use crate::store::Store;
use shared::models::{Resource, ResourceCreate, ResourceKind, ResourceStatus};

#[derive(Debug, Clone)]
pub struct LocationRegistry {
    store: Store,
}

impl LocationRegistry {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Register a new table or room, initially Available.
    pub fn register(&self, payload: ResourceCreate) -> EngineResult<Resource> {
        if payload.capacity <= 0 {
            return Err(EngineError::InvalidGuestCount(payload.capacity));
        }

        let txn = self.store.begin_write()?;
        let id = self.store.next_id(&txn, "resource")?;
        let resource = Resource {
            id,
            kind: payload.kind,
            name: payload.name,
            capacity: payload.capacity,
            rate: payload.rate,
            status: ResourceStatus::Available,
        };
        self.store.put_resource(&txn, &resource)?;
        txn.commit().map_err(crate::store::StoreError::from)?;

        tracing::info!(resource_id = id, kind = ?resource.kind, name = %resource.name, "Resource registered");
        Ok(resource)
    }

    pub fn get(&self, id: i64) -> EngineResult<Resource> {
        self.store
            .get_resource(id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Resource,
                id,
            })
    }

    /// Direct status write, enum validity only.
    pub fn set_status(&self, id: i64, status: ResourceStatus) -> EngineResult<Resource> {
        let txn = self.store.begin_write()?;
        let mut resource = self
            .store
            .get_resource_txn(&txn, id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Resource,
                id,
            })?;
        resource.status = status;
        self.store.put_resource(&txn, &resource)?;
        txn.commit().map_err(crate::store::StoreError::from)?;

        tracing::debug!(resource_id = id, status = ?status, "Resource status set");
        Ok(resource)
    }

    pub fn list(&self, kind: Option<ResourceKind>) -> EngineResult<Vec<Resource>> {
        let resources = self.store.list_resources()?;
        Ok(match kind {
            Some(k) => resources.into_iter().filter(|r| r.kind == k).collect(),
            None => resources,
        })
    }

    /// Candidate selection for new orders, bookings and check-ins.
    pub fn list_available(&self, kind: ResourceKind) -> EngineResult<Vec<Resource>> {
        Ok(self
            .store
            .list_resources()?
            .into_iter()
            .filter(|r| r.kind == kind && r.is_available())
            .collect())
    }
}
