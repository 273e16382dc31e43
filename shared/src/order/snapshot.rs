//! Order snapshot - the persisted state the engine's state machine evolves

use super::types::{Discount, LineSnapshot, OrderType, PaymentRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status. `Pending` and `Held` are the open states; `Settled`
/// and `Cancelled` are terminal. Payment progress ("unpaid",
/// "partially paid") is derived from the payment records, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Held,
    Settled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Held)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Settled | OrderStatus::Cancelled)
    }
}

/// Order snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    pub id: i64,
    /// Display number, e.g. `PED2026082310001`
    pub order_no: String,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    /// Occupied table for dine-in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Target room for room service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
    /// Active occupancy linked at open time for room service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupy_id: Option<i64>,
    pub guest_count: i32,
    pub lines: Vec<LineSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_discount: Option<Discount>,
    /// Fraction, e.g. 0.21 for 21% IVA
    pub tax_rate: Decimal,
    /// Sum of line totals
    pub subtotal: Decimal,
    /// Cart discount actually applied (clamped to subtotal)
    pub discount_total: Decimal,
    /// Tax on the discounted subtotal
    pub tax: Decimal,
    /// `subtotal - discount_total + tax`, never negative
    pub total: Decimal,
    pub payments: Vec<PaymentRecord>,
    pub status: OrderStatus,
    /// Set after the first ticket dispatch
    #[serde(default)]
    pub kot_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<i64>,
}

impl OrderSnapshot {
    /// Sum of non-refunded payment amounts.
    pub fn paid_total(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.amount)
            .sum()
    }

    pub fn change_total(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.change)
            .sum()
    }

    /// Amount still uncovered; negative when over-paid.
    pub fn remaining_amount(&self) -> Decimal {
        self.total - self.paid_total()
    }

    pub fn payment(&self, payment_id: i64) -> Option<&PaymentRecord> {
        self.payments.iter().find(|p| p.payment_id == payment_id)
    }

    pub fn next_payment_id(&self) -> i64 {
        self.payments.len() as i64 + 1
    }

    pub fn next_line_no(&self) -> u32 {
        self.lines.len() as u32 + 1
    }

    /// Whether any line is still owed to the kitchen.
    pub fn has_unticketed_lines(&self) -> bool {
        self.lines.iter().any(|l| l.needs_dispatch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::types::PaymentStatus;

    fn payment(id: i64, amount: Decimal, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            payment_id: id,
            method: "CASH".to_string(),
            amount,
            tendered: None,
            change: Decimal::ZERO,
            status,
            note: None,
            at: 0,
            refund_reason: None,
            refunded_at: None,
        }
    }

    fn snapshot_with_payments(total: Decimal, payments: Vec<PaymentRecord>) -> OrderSnapshot {
        OrderSnapshot {
            id: 1,
            order_no: "PED2026010110001".to_string(),
            order_type: OrderType::Takeaway,
            customer_id: None,
            table_id: None,
            table_name: None,
            room_id: None,
            occupy_id: None,
            guest_count: 1,
            lines: Vec::new(),
            cart_discount: None,
            tax_rate: Decimal::ZERO,
            subtotal: total,
            discount_total: Decimal::ZERO,
            tax: Decimal::ZERO,
            total,
            payments,
            status: OrderStatus::Pending,
            kot_sent: false,
            note: None,
            created_at: 0,
            updated_at: 0,
            settled_at: None,
        }
    }

    #[test]
    fn test_paid_total_skips_refunded() {
        let snap = snapshot_with_payments(
            Decimal::from(50),
            vec![
                payment(1, Decimal::from(30), PaymentStatus::Completed),
                payment(2, Decimal::from(20), PaymentStatus::Refunded),
            ],
        );
        assert_eq!(snap.paid_total(), Decimal::from(30));
        assert_eq!(snap.remaining_amount(), Decimal::from(20));
    }

    #[test]
    fn test_remaining_negative_when_overpaid() {
        let snap = snapshot_with_payments(
            Decimal::from(10),
            vec![payment(1, Decimal::from(15), PaymentStatus::Completed)],
        );
        assert_eq!(snap.remaining_amount(), Decimal::from(-5));
    }

    #[test]
    fn test_status_helpers() {
        assert!(OrderStatus::Pending.is_open());
        assert!(OrderStatus::Held.is_open());
        assert!(!OrderStatus::Settled.is_open());
        assert!(OrderStatus::Settled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }
}
