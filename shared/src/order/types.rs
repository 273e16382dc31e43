//! Order input payloads and embedded records

use crate::models::product::PrepArea;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
    /// Consumption billed to a hotel room folio
    RoomService,
}

/// Discount adjustment kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    Percentage,
    FixedAmount,
}

/// A discount: percentage of the base (value = percent, 0-100) or a
/// fixed amount. Applied amounts are clamped so no base goes negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: Decimal,
}

impl Discount {
    pub fn percentage(value: Decimal) -> Self {
        Self { kind: DiscountKind::Percentage, value }
    }

    pub fn fixed(value: Decimal) -> Self {
        Self { kind: DiscountKind::FixedAmount, value }
    }

    /// Raw amount this discount takes off `base` (uncapped, unrounded).
    pub fn amount_off(&self, base: Decimal) -> Decimal {
        match self.kind {
            DiscountKind::Percentage => base * self.value / Decimal::from(100),
            DiscountKind::FixedAmount => self.value,
        }
    }
}

/// Line item as submitted by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    /// Include this line in kitchen dispatch. Defaults to true for
    /// products with a prep area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Line item as stored on the order. Name, price and prep area are
/// copied from the catalog at add time; later catalog edits never
/// touch existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSnapshot {
    /// Ordinal within the order, starting at 1
    pub line_no: u32,
    pub product_id: i64,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    /// `unit_price * quantity - discount`, floored at zero, 2 dp
    pub line_total: Decimal,
    pub prep_area: PrepArea,
    /// Whether this line takes part in kitchen dispatch
    pub dispatch_selected: bool,
    /// Set once the line has appeared on a kitchen ticket
    #[serde(default)]
    pub ticketed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Payment status. The engine records payments as `Completed`
/// (no gateway round-trip) and flips them to `Refunded`; `Pending`
/// and `Failed` exist for hosts that front a gateway.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    #[default]
    Completed,
    Failed,
    Refunded,
}

/// Payment as submitted by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    /// Free-form method label: `CASH`, `CARD`, `ROOM_ACCOUNT`, ...
    pub method: String,
    pub amount: Decimal,
    /// Cash handed over; change is computed when it exceeds `amount`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendered: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Payment as stored on the order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    /// Ordinal within the order, starting at 1
    pub payment_id: i64,
    pub method: String,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tendered: Option<Decimal>,
    pub change: Decimal,
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_at: Option<i64>,
}

impl LineSnapshot {
    /// Still owed to the kitchen: selected for dispatch, has a prep
    /// area, not yet on a ticket.
    pub fn needs_dispatch(&self) -> bool {
        self.dispatch_selected && !self.ticketed && self.prep_area != PrepArea::None
    }
}

impl PaymentRecord {
    /// Refunded payments no longer count toward coverage.
    pub fn is_active(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

/// Per-method settlement summary line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentSummaryItem {
    pub method: String,
    pub amount: Decimal,
}

/// Payload for opening a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub order_type: OrderType,
    pub customer_id: Option<i64>,
    /// Required for dine-in
    pub table_id: Option<i64>,
    /// Required for room service
    pub room_id: Option<i64>,
    pub guest_count: i32,
    pub lines: Vec<LineInput>,
    pub cart_discount: Option<Discount>,
    /// Defaults to the engine's configured rate when omitted
    pub tax_rate: Option<Decimal>,
    pub note: Option<String>,
}
