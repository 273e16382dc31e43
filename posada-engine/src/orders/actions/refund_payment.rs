//! RefundPayment action
//!
//! Flips one payment to refunded. Refunding against a settled order
//! records the fact but never reopens the order; correcting the books
//! afterwards is a manual, deliberate step.

use crate::core::error::{EngineError, EngineResult, Entity};
use crate::orders::traits::{ActionContext, ActionOutcome, OrderAction};
use shared::event::EventPayload;
use shared::order::{OrderStatus, PaymentStatus};

#[derive(Debug, Clone)]
pub struct RefundPaymentAction {
    pub order_id: i64,
    pub payment_id: i64,
    pub reason: Option<String>,
}

impl OrderAction for RefundPaymentAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        let mut order = ctx.load_order(self.order_id)?;

        let position = order
            .payments
            .iter()
            .position(|p| p.payment_id == self.payment_id)
            .ok_or(EngineError::NotFound {
                entity: Entity::Payment,
                id: self.payment_id,
            })?;
        if !order.payments[position].is_active() {
            return Err(EngineError::PaymentNotRefundable {
                order_id: self.order_id,
                payment_id: self.payment_id,
            });
        }

        let payment = &mut order.payments[position];
        payment.status = PaymentStatus::Refunded;
        payment.refund_reason = self.reason.clone();
        payment.refunded_at = Some(ctx.now);
        let amount = payment.amount;

        if order.status == OrderStatus::Settled {
            tracing::warn!(
                order_id = order.id,
                payment_id = self.payment_id,
                %amount,
                "Refund recorded against a settled order; order stays settled"
            );
        }

        order.updated_at = ctx.now;
        ctx.store.store_order(ctx.txn, &order)?;

        let event = EventPayload::PaymentRefunded {
            order_id: order.id,
            payment_id: self.payment_id,
            amount,
        };
        Ok(ActionOutcome::with_event(order, event))
    }
}
