//! Resource Model - sellable physical spaces (dining tables and guest rooms)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Resource kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Table,
    Room,
}

/// Coarse availability flag. Workflow modules (bookings, occupancy,
/// orders) drive the transitions; the registry only stores the value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Maintenance,
}

/// Resource entity (桌台/客房)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: i64,
    pub kind: ResourceKind,
    pub name: String,
    /// Seats for a table, beds for a room.
    pub capacity: i32,
    /// Nightly rate for rooms; unused for tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    pub status: ResourceStatus,
}

impl Resource {
    pub fn is_available(&self) -> bool {
        self.status == ResourceStatus::Available
    }
}

/// Create resource payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCreate {
    pub kind: ResourceKind,
    pub name: String,
    pub capacity: i32,
    pub rate: Option<Decimal>,
}
