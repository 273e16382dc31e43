//! Occupancy Model - in-house hotel stays and their folio

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccupancyStatus {
    #[default]
    Active,
    CheckedOut,
}

/// Folio charge classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeKind {
    /// Nightly room rate
    Room,
    /// Restaurant/bar consumption settled to the room account
    Pos,
    Other,
}

/// A single folio line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Charge {
    /// Ordinal within the occupancy, starting at 1
    pub id: i64,
    pub kind: ChargeKind,
    pub description: String,
    pub amount: Decimal,
    pub at: i64,
}

/// Payment applied against the folio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillPayment {
    pub method: String,
    pub amount: Decimal,
    pub at: i64,
}

/// Room occupancy entity (入住单)
///
/// One active stay can span several rooms. `advance` is the deposit
/// taken at check-in and counts toward the folio balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomOccupy {
    pub id: i64,
    pub customer_id: i64,
    pub room_ids: Vec<i64>,
    pub charges: Vec<Charge>,
    pub payments: Vec<BillPayment>,
    pub advance: Decimal,
    pub status: OccupancyStatus,
    pub in_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RoomOccupy {
    pub fn is_active(&self) -> bool {
        self.status == OccupancyStatus::Active
    }

    pub fn charge_total(&self) -> Decimal {
        self.charges.iter().map(|c| c.amount).sum()
    }

    /// Running total for one charge kind.
    pub fn charge_total_of(&self, kind: ChargeKind) -> Decimal {
        self.charges
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.amount)
            .sum()
    }

    pub fn paid_total(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Outstanding folio balance: charges less advance and payments.
    pub fn balance(&self) -> Decimal {
        self.charge_total() - self.advance - self.paid_total()
    }
}
