//! DispatchTickets action
//!
//! Derives KOT/BOT slips from the order's undispatched lines. Calling
//! it again without new lines is a no-op, never an error; lines added
//! after a dispatch land on a fresh ticket on the next call.

use crate::core::error::EngineResult;
use crate::kitchen;
use crate::orders::traits::{require_status, ActionContext, ActionOutcome, OrderAction};
use shared::event::EventPayload;
use shared::models::{KitchenTicket, TicketStatus};
use shared::order::OrderStatus;

#[derive(Debug, Clone)]
pub struct DispatchTicketsAction {
    pub order_id: i64,
}

impl OrderAction for DispatchTicketsAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        // 1. Load; dispatch is legal while the order is open
        let mut order = ctx.load_order(self.order_id)?;
        require_status(
            &order,
            &[OrderStatus::Pending, OrderStatus::Held],
            "dispatch tickets",
        )?;

        // 2. Derive one ticket per prep area
        let groups = kitchen::ticket_groups(&order);
        if groups.is_empty() {
            return Ok(ActionOutcome::new(order));
        }

        let mut tickets = Vec::with_capacity(groups.len());
        for (kind, items) in groups {
            let id = ctx.store.next_id(ctx.txn, "ticket")?;
            let ticket = KitchenTicket {
                id,
                ticket_no: ctx.next_ticket_number(kind)?,
                order_id: order.id,
                order_no: order.order_no.clone(),
                kind,
                table_name: order.table_name.clone(),
                items,
                status: TicketStatus::Sent,
                created_at: ctx.now,
                updated_at: ctx.now,
            };
            ctx.store.store_ticket(ctx.txn, &ticket)?;
            tickets.push(ticket);
        }

        // 3. Flag the source lines so re-dispatch skips them
        for line in &mut order.lines {
            if line.needs_dispatch() {
                line.ticketed = true;
            }
        }
        order.kot_sent = true;
        order.updated_at = ctx.now;
        ctx.store.store_order(ctx.txn, &order)?;

        let event = EventPayload::TicketsDispatched {
            order_id: order.id,
            ticket_ids: tickets.iter().map(|t| t.id).collect(),
        };
        let mut outcome = ActionOutcome::with_event(order, event);
        outcome.tickets = tickets;
        Ok(outcome)
    }
}
