//! Sale Model - immutable settlement records (facturas)

use crate::order::{LineSnapshot, OrderType, PaymentSummaryItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sale entity (销售单/factura)
///
/// Written exactly once when an order settles. Never updated or
/// deleted; refunds mark the payment record on the order instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    pub id: i64,
    /// Fiscal receipt number, e.g. `FAC2026082310001`
    pub receipt_number: String,
    pub order_id: i64,
    pub order_no: String,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Line snapshots as they stood at settlement
    pub lines: Vec<LineSnapshot>,
    pub subtotal: Decimal,
    pub discount_total: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// Sum of active payments at settlement
    pub paid_total: Decimal,
    pub change_total: Decimal,
    /// Amounts per payment method, change already deducted from cash
    pub payment_summary: Vec<PaymentSummaryItem>,
    /// Uncovered remainder on a credit settlement; zero otherwise
    pub credit: Decimal,
    pub settled_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
