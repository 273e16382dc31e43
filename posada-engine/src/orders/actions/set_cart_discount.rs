//! SetCartDiscount action
//!
//! Sets or clears the order-level discount and reprices.

use crate::core::error::EngineResult;
use crate::money;
use crate::orders::traits::{require_status, ActionContext, ActionOutcome, OrderAction};
use shared::event::EventPayload;
use shared::order::{Discount, OrderStatus};

#[derive(Debug, Clone)]
pub struct SetCartDiscountAction {
    pub order_id: i64,
    /// `None` clears an existing discount
    pub discount: Option<Discount>,
}

impl OrderAction for SetCartDiscountAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        if let Some(discount) = &self.discount {
            money::validate_discount(discount)?;
        }

        let mut order = ctx.load_order(self.order_id)?;
        require_status(&order, &[OrderStatus::Pending], "change cart discount")?;

        order.cart_discount = self.discount;
        money::recalculate_totals(&mut order);
        order.updated_at = ctx.now;
        ctx.store.store_order(ctx.txn, &order)?;

        let event = EventPayload::CartDiscountChanged {
            order_id: order.id,
            discount_total: order.discount_total,
            total: order.total,
        };
        Ok(ActionOutcome::with_event(order, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EngineError;
    use crate::orders::actions::testutil::*;
    use crate::orders::actions::OpenOrderAction;
    use rust_decimal::Decimal;
    use shared::order::OrderSnapshot;
    use shared::util::now_millis;

    fn open_and_discount(
        discount: Option<Discount>,
    ) -> (crate::store::Store, EngineResult<OrderSnapshot>) {
        let (store, catalog) = store_with_catalog();
        let txn = store.begin_write().unwrap();
        let ctx = ActionContext::new(&txn, &store, &catalog, Decimal::ZERO, now_millis());
        let order = OpenOrderAction {
            draft: takeaway_draft(vec![line(1, 2)]),
        }
        .execute(&ctx)
        .unwrap()
        .order;
        txn.commit().unwrap();

        let txn = store.begin_write().unwrap();
        let ctx = ActionContext::new(&txn, &store, &catalog, Decimal::ZERO, now_millis());
        let result = SetCartDiscountAction {
            order_id: order.id,
            discount,
        }
        .execute(&ctx)
        .map(|o| o.order);
        if result.is_ok() {
            txn.commit().unwrap();
        }
        (store, result)
    }

    #[test]
    fn test_discount_applies_and_clears() {
        let (_store, result) = open_and_discount(Some(Discount::percentage(dec("50"))));
        let order = result.unwrap();
        assert_eq!(order.discount_total, dec("10.00"));
        assert_eq!(order.total, dec("10.00"));
    }

    #[test]
    fn test_invalid_percentage_rejected() {
        let (_store, result) = open_and_discount(Some(Discount::percentage(dec("120"))));
        assert!(matches!(result, Err(EngineError::InvalidDiscount(_))));
    }
}
