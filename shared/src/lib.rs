//! Shared types for the Posada suite
//!
//! Domain models and value types used across the engine and satellite
//! crates (printer bridge, desktop client): catalog, locations,
//! bookings, occupancy, orders, tickets and sales.

pub mod event;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use event::{EventPayload, LifecycleEvent};
pub use serde::{Deserialize, Serialize};
