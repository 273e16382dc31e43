//! Hold / Resume actions
//!
//! Parks a pending order and brings it back. A held order keeps its
//! table and accepts no lines or payments until resumed.

use crate::core::error::EngineResult;
use crate::orders::traits::{require_status, ActionContext, ActionOutcome, OrderAction};
use shared::event::EventPayload;
use shared::order::OrderStatus;

#[derive(Debug, Clone)]
pub struct HoldOrderAction {
    pub order_id: i64,
}

impl OrderAction for HoldOrderAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        let mut order = ctx.load_order(self.order_id)?;
        require_status(&order, &[OrderStatus::Pending], "hold")?;

        order.status = OrderStatus::Held;
        order.updated_at = ctx.now;
        ctx.store.store_order(ctx.txn, &order)?;

        let event = EventPayload::OrderHeld { order_id: order.id };
        Ok(ActionOutcome::with_event(order, event))
    }
}

#[derive(Debug, Clone)]
pub struct ResumeOrderAction {
    pub order_id: i64,
}

impl OrderAction for ResumeOrderAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        let mut order = ctx.load_order(self.order_id)?;
        require_status(&order, &[OrderStatus::Held], "resume")?;

        order.status = OrderStatus::Pending;
        order.updated_at = ctx.now;
        ctx.store.store_order(ctx.txn, &order)?;

        let event = EventPayload::OrderResumed { order_id: order.id };
        Ok(ActionOutcome::with_event(order, event))
    }
}
