//! Order value types
//!
//! Inputs (drafts, line/payment inputs) and the persisted snapshot
//! the engine's state machine evolves. Totals are computed by the
//! engine and stored denormalized on the snapshot.

pub mod snapshot;
pub mod types;

// Re-exports
pub use snapshot::{OrderSnapshot, OrderStatus};
pub use types::*;
