//! RecordPayment action
//!
//! Appends a completed payment to a pending order. Over-tendering is
//! legal for cash; the change figure absorbs the difference.
//! Over-paying the total is also legal: the surplus surfaces through
//! `change_total()` and reconciliation.

use crate::core::error::EngineResult;
use crate::money::{self, round2};
use crate::orders::traits::{require_status, ActionContext, ActionOutcome, OrderAction};
use rust_decimal::Decimal;
use shared::event::EventPayload;
use shared::order::{OrderStatus, PaymentInput, PaymentRecord, PaymentStatus};

#[derive(Debug, Clone)]
pub struct RecordPaymentAction {
    pub order_id: i64,
    pub payment: PaymentInput,
}

impl OrderAction for RecordPaymentAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        // 1. Validate amount and tendered bounds
        money::validate_payment(&self.payment)?;

        // 2. Pending only; held orders must be resumed first
        let mut order = ctx.load_order(self.order_id)?;
        require_status(&order, &[OrderStatus::Pending], "record payment")?;

        // 3. Append the record
        let amount = round2(self.payment.amount);
        let change = self
            .payment
            .tendered
            .map(|t| round2((t - amount).max(Decimal::ZERO)))
            .unwrap_or(Decimal::ZERO);
        let payment_id = order.next_payment_id();
        order.payments.push(PaymentRecord {
            payment_id,
            method: self.payment.method.clone(),
            amount,
            tendered: self.payment.tendered.map(round2),
            change,
            status: PaymentStatus::Completed,
            note: self.payment.note.clone(),
            at: ctx.now,
            refund_reason: None,
            refunded_at: None,
        });
        order.updated_at = ctx.now;
        ctx.store.store_order(ctx.txn, &order)?;

        let event = EventPayload::PaymentRecorded {
            order_id: order.id,
            payment_id,
            method: self.payment.method.clone(),
            amount,
        };
        Ok(ActionOutcome::with_event(order, event))
    }
}
