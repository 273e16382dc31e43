//! Lifecycle events - broadcast to printing and reporting consumers
//!
//! Emitted by the engine after the owning transaction commits, never
//! before. Payloads carry ids and headline figures, not full entities;
//! consumers fetch what they need.

use crate::models::{BookingStatus, ChargeKind, TicketStatus};
use crate::order::OrderType;
use crate::util::now_millis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single engine notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Unix milliseconds at emission
    pub at: i64,
    pub payload: EventPayload,
}

impl LifecycleEvent {
    pub fn new(payload: EventPayload) -> Self {
        Self { at: now_millis(), payload }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    // ========== Orders ==========
    OrderOpened {
        order_id: i64,
        order_no: String,
        order_type: OrderType,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<i64>,
    },
    LinesAdded {
        order_id: i64,
        line_count: usize,
        total: Decimal,
    },
    CartDiscountChanged {
        order_id: i64,
        discount_total: Decimal,
        total: Decimal,
    },
    OrderHeld {
        order_id: i64,
    },
    OrderResumed {
        order_id: i64,
    },
    OrderCancelled {
        order_id: i64,
    },
    OrderSettled {
        order_id: i64,
        sale_id: i64,
        receipt_number: String,
        total: Decimal,
    },

    // ========== Payments ==========
    PaymentRecorded {
        order_id: i64,
        payment_id: i64,
        method: String,
        amount: Decimal,
    },
    PaymentRefunded {
        order_id: i64,
        payment_id: i64,
        amount: Decimal,
    },

    // ========== Kitchen ==========
    TicketsDispatched {
        order_id: i64,
        ticket_ids: Vec<i64>,
    },
    TicketStatusChanged {
        ticket_id: i64,
        status: TicketStatus,
    },

    // ========== Bookings ==========
    BookingCreated {
        booking_id: i64,
        resource_id: i64,
    },
    BookingStatusChanged {
        booking_id: i64,
        status: BookingStatus,
    },

    // ========== Occupancy ==========
    OccupancyOpened {
        occupy_id: i64,
        room_ids: Vec<i64>,
    },
    ChargeAdded {
        occupy_id: i64,
        kind: ChargeKind,
        amount: Decimal,
    },
    OccupancyClosed {
        occupy_id: i64,
        balance: Decimal,
        forced: bool,
    },
}
