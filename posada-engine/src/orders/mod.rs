//! Order lifecycle module
//!
//! The POS state machine: `Pending <-> Held`, terminal `Settled` /
//! `Cancelled`. Each operation is an action executed by the
//! [`OrdersManager`](manager::OrdersManager) inside one write
//! transaction; lifecycle events broadcast after the commit.

pub mod actions;
pub mod manager;
pub mod traits;

pub use manager::{OrdersManager, Reconciliation};

/// Payment method that settles to a room folio instead of the till.
pub const ROOM_ACCOUNT_METHOD: &str = "ROOM_ACCOUNT";
