//! SettleOrder action
//!
//! The terminal happy path: freezes the order into an immutable sale,
//! frees the table, and posts room-account consumption to the folio.
//! Everything happens in the caller's single transaction.

use crate::core::error::{EngineError, EngineResult, Entity};
use crate::money::{is_payment_sufficient, round2};
use crate::orders::traits::{require_status, ActionContext, ActionOutcome, OrderAction};
use crate::orders::ROOM_ACCOUNT_METHOD;
use rust_decimal::Decimal;
use shared::event::EventPayload;
use shared::models::{Charge, ChargeKind, ResourceStatus, Sale};
use shared::order::{OrderStatus, OrderType, PaymentSummaryItem};

#[derive(Debug, Clone)]
pub struct SettleOrderAction {
    pub order_id: i64,
    /// Settle even when payments fall short; the gap is recorded as
    /// credit on the sale.
    pub allow_credit: bool,
}

impl OrderAction for SettleOrderAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        // 1. Pending only; a settled order cannot settle twice
        let mut order = ctx.load_order(self.order_id)?;
        require_status(&order, &[OrderStatus::Pending], "settle")?;

        // 2. Coverage check
        let paid = round2(order.paid_total());
        if !is_payment_sufficient(paid, order.total) {
            if !self.allow_credit {
                return Err(EngineError::InsufficientPayment {
                    order_id: order.id,
                    paid,
                    total: order.total,
                });
            }
            tracing::warn!(
                order_id = order.id,
                %paid,
                total = %order.total,
                "Credit settlement: payments do not cover the total"
            );
        }
        let credit = round2((order.total - paid).max(Decimal::ZERO));

        // 3. Per-method summary over active payments
        let mut payment_summary: Vec<PaymentSummaryItem> = Vec::new();
        for payment in order.payments.iter().filter(|p| p.is_active()) {
            match payment_summary.iter_mut().find(|s| s.method == payment.method) {
                Some(item) => item.amount += payment.amount,
                None => payment_summary.push(PaymentSummaryItem {
                    method: payment.method.clone(),
                    amount: payment.amount,
                }),
            }
        }
        for item in &mut payment_summary {
            item.amount = round2(item.amount);
        }

        // 4. Write the immutable sale
        let sale_id = ctx.store.next_id(ctx.txn, "sale")?;
        let sale = Sale {
            id: sale_id,
            receipt_number: ctx.next_receipt_number()?,
            order_id: order.id,
            order_no: order.order_no.clone(),
            order_type: order.order_type,
            table_name: order.table_name.clone(),
            lines: order.lines.clone(),
            subtotal: order.subtotal,
            discount_total: order.discount_total,
            tax_rate: order.tax_rate,
            tax: order.tax,
            total: order.total,
            paid_total: paid,
            change_total: round2(order.change_total()),
            payment_summary,
            credit,
            settled_at: ctx.now,
            note: order.note.clone(),
        };
        ctx.store.store_sale(ctx.txn, &sale)?;

        // 5. Close the order and drop it from the active index
        order.status = OrderStatus::Settled;
        order.settled_at = Some(ctx.now);
        order.updated_at = ctx.now;
        ctx.store.store_order(ctx.txn, &order)?;
        ctx.store.mark_order_inactive(ctx.txn, order.id)?;

        // 6. Free the dine-in table
        if order.order_type == OrderType::DineIn
            && let Some(table_id) = order.table_id
            && let Some(mut table) = ctx.store.get_resource_txn(ctx.txn, table_id)?
        {
            table.status = ResourceStatus::Available;
            ctx.store.put_resource(ctx.txn, &table)?;
        }

        // 7. Post room-account consumption to the linked folio
        if let Some(occupy_id) = order.occupy_id {
            let room_account: Decimal = order
                .payments
                .iter()
                .filter(|p| p.is_active() && p.method == ROOM_ACCOUNT_METHOD)
                .map(|p| p.amount)
                .sum();
            if room_account > Decimal::ZERO {
                let mut occupancy = ctx
                    .store
                    .get_occupancy_txn(ctx.txn, occupy_id)?
                    .ok_or(EngineError::NotFound {
                        entity: Entity::Occupancy,
                        id: occupy_id,
                    })?;
                // the stay ended between opening and settling: take
                // another payment method instead of a dead folio
                if !occupancy.is_active() {
                    return Err(EngineError::OccupancyNotActive { occupy_id });
                }
                occupancy.charges.push(Charge {
                    id: occupancy.charges.len() as i64 + 1,
                    kind: ChargeKind::Pos,
                    description: format!("Room service {}", order.order_no),
                    amount: round2(room_account),
                    at: ctx.now,
                });
                ctx.store.put_occupancy(ctx.txn, &occupancy)?;
            }
        }

        let event = EventPayload::OrderSettled {
            order_id: order.id,
            sale_id,
            receipt_number: sale.receipt_number.clone(),
            total: order.total,
        };
        let mut outcome = ActionOutcome::with_event(order, event);
        outcome.sale = Some(sale);
        Ok(outcome)
    }
}
