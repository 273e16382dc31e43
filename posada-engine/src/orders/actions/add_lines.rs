//! AddLines action
//!
//! Appends line items to a pending order and reprices it.

use super::line_from_input;
use crate::core::error::{EngineError, EngineResult};
use crate::money;
use crate::orders::traits::{require_status, ActionContext, ActionOutcome, OrderAction};
use shared::event::EventPayload;
use shared::order::{LineInput, OrderStatus};

#[derive(Debug, Clone)]
pub struct AddLinesAction {
    pub order_id: i64,
    pub lines: Vec<LineInput>,
}

impl OrderAction for AddLinesAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        // 1. Validate inputs
        if self.lines.is_empty() {
            return Err(EngineError::EmptyOrder);
        }
        for line in &self.lines {
            money::validate_line(line)?;
        }

        // 2. Load the order; held orders must be resumed first
        let mut order = ctx.load_order(self.order_id)?;
        require_status(&order, &[OrderStatus::Pending], "add lines")?;

        // 3. Append snapshots and reprice
        for input in &self.lines {
            let product = ctx.catalog.require_sellable(input.product_id)?;
            let line_no = order.next_line_no();
            order.lines.push(line_from_input(line_no, &product, input));
        }
        money::recalculate_totals(&mut order);
        order.updated_at = ctx.now;

        ctx.store.store_order(ctx.txn, &order)?;

        let event = EventPayload::LinesAdded {
            order_id: order.id,
            line_count: self.lines.len(),
            total: order.total,
        };
        Ok(ActionOutcome::with_event(order, event))
    }
}
