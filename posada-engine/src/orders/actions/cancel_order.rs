//! CancelOrder action
//!
//! Terminal no-sale path. Payments already recorded stay on the order;
//! refunding them is a separate, explicit step.

use crate::core::error::EngineResult;
use crate::orders::traits::{require_status, ActionContext, ActionOutcome, OrderAction};
use shared::event::EventPayload;
use shared::models::{ResourceStatus, TicketStatus};
use shared::order::{OrderStatus, OrderType};

#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: i64,
}

impl OrderAction for CancelOrderAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        // 1. Open orders only; settled orders are immutable
        let mut order = ctx.load_order(self.order_id)?;
        require_status(&order, &[OrderStatus::Pending, OrderStatus::Held], "cancel")?;

        // 2. Close and de-index
        order.status = OrderStatus::Cancelled;
        order.updated_at = ctx.now;
        ctx.store.store_order(ctx.txn, &order)?;
        ctx.store.mark_order_inactive(ctx.txn, order.id)?;

        // 3. Free the dine-in table
        if order.order_type == OrderType::DineIn
            && let Some(table_id) = order.table_id
            && let Some(mut table) = ctx.store.get_resource_txn(ctx.txn, table_id)?
        {
            table.status = ResourceStatus::Available;
            ctx.store.put_resource(ctx.txn, &table)?;
        }

        // 4. Pull open tickets back from the kitchen, same txn
        let mut events = vec![EventPayload::OrderCancelled { order_id: order.id }];
        for mut ticket in ctx.store.list_tickets_for_order_txn(ctx.txn, order.id)? {
            if ticket.status.is_terminal() {
                continue;
            }
            ticket.status = TicketStatus::Cancelled;
            ticket.updated_at = ctx.now;
            ctx.store.store_ticket(ctx.txn, &ticket)?;
            events.push(EventPayload::TicketStatusChanged {
                ticket_id: ticket.id,
                status: TicketStatus::Cancelled,
            });
        }

        let mut outcome = ActionOutcome::new(order);
        outcome.events = events;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EngineError;
    use crate::orders::actions::testutil::*;
    use crate::orders::actions::{DispatchTicketsAction, OpenOrderAction, RecordPaymentAction};
    use rust_decimal::Decimal;
    use shared::order::PaymentInput;
    use shared::util::now_millis;

    fn run<A: OrderAction>(
        action: &A,
        store: &crate::store::Store,
        catalog: &crate::catalog::CatalogService,
    ) -> EngineResult<ActionOutcome> {
        let txn = store.begin_write().unwrap();
        let ctx = ActionContext::new(&txn, store, catalog, Decimal::ZERO, now_millis());
        let outcome = action.execute(&ctx)?;
        txn.commit().unwrap();
        Ok(outcome)
    }

    #[test]
    fn test_cancel_releases_table_and_open_tickets() {
        let (store, catalog) = store_with_catalog();
        let table = register_table(&store, "T1");
        let order = run(
            &OpenOrderAction {
                draft: dine_in_draft(table.id, vec![line(1, 1), line(2, 1)]),
            },
            &store,
            &catalog,
        )
        .unwrap()
        .order;
        run(&DispatchTicketsAction { order_id: order.id }, &store, &catalog).unwrap();

        let outcome = run(&CancelOrderAction { order_id: order.id }, &store, &catalog).unwrap();
        assert_eq!(outcome.order.status, OrderStatus::Cancelled);
        // OrderCancelled + one per cancelled ticket
        assert_eq!(outcome.events.len(), 3);

        assert_eq!(
            store.get_resource(table.id).unwrap().unwrap().status,
            ResourceStatus::Available
        );
        for ticket in store.list_tickets_for_order(order.id).unwrap() {
            assert_eq!(ticket.status, TicketStatus::Cancelled);
        }
        assert!(store.get_active_order_ids().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_keeps_payments() {
        let (store, catalog) = store_with_catalog();
        let order = run(
            &OpenOrderAction {
                draft: takeaway_draft(vec![line(1, 1)]),
            },
            &store,
            &catalog,
        )
        .unwrap()
        .order;
        run(
            &RecordPaymentAction {
                order_id: order.id,
                payment: PaymentInput {
                    method: "CASH".to_string(),
                    amount: dec("10.00"),
                    tendered: None,
                    note: None,
                },
            },
            &store,
            &catalog,
        )
        .unwrap();

        let outcome = run(&CancelOrderAction { order_id: order.id }, &store, &catalog).unwrap();
        assert_eq!(outcome.order.payments.len(), 1);
        assert_eq!(outcome.order.paid_total(), dec("10.00"));
    }

    #[test]
    fn test_settled_order_cannot_cancel() {
        let (store, catalog) = store_with_catalog();
        let order = run(
            &OpenOrderAction {
                draft: takeaway_draft(vec![line(1, 1)]),
            },
            &store,
            &catalog,
        )
        .unwrap()
        .order;
        run(
            &RecordPaymentAction {
                order_id: order.id,
                payment: PaymentInput {
                    method: "CASH".to_string(),
                    amount: dec("10.00"),
                    tendered: None,
                    note: None,
                },
            },
            &store,
            &catalog,
        )
        .unwrap();
        run(
            &crate::orders::actions::SettleOrderAction {
                order_id: order.id,
                allow_credit: false,
            },
            &store,
            &catalog,
        )
        .unwrap();

        let err = run(&CancelOrderAction { order_id: order.id }, &store, &catalog).unwrap_err();
        assert!(matches!(
            err,
            EngineError::OrderState { status: OrderStatus::Settled, .. }
        ));
    }
}
