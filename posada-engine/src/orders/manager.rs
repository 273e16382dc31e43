//! OrdersManager - runs order actions and fans out their events
//!
//! One public method per operation. Every method builds an action,
//! executes it inside a single write transaction, commits, and only
//! then broadcasts the produced events. A failed action rolls the
//! whole transaction back, including any counters it bumped.

use crate::catalog::CatalogService;
use crate::core::error::{EngineError, EngineResult, Entity};
use crate::money::{is_payment_sufficient, round2};
use crate::orders::actions::{
    AddLinesAction, CancelOrderAction, DispatchTicketsAction, HoldOrderAction, OpenOrderAction,
    RecordPaymentAction, RefundPaymentAction, ResumeOrderAction, SetCartDiscountAction,
    SettleOrderAction,
};
use crate::orders::traits::{ActionContext, ActionOutcome, OrderAction};
use crate::store::{Store, StoreError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::event::LifecycleEvent;
use shared::models::{KitchenTicket, Sale};
use shared::order::{
    Discount, LineInput, OrderDraft, OrderSnapshot, OrderStatus, PaymentInput,
};
use shared::util::now_millis;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Payments-versus-total comparison for one order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Still owed by the guest, floored at zero
    pub dues: Decimal,
    /// Owed back to the guest, floored at zero
    pub change: Decimal,
    /// Whether this call settled the order
    pub settled: bool,
}

#[derive(Clone)]
pub struct OrdersManager {
    store: Store,
    catalog: Arc<CatalogService>,
    event_tx: broadcast::Sender<LifecycleEvent>,
    default_tax_rate: Decimal,
}

impl OrdersManager {
    pub fn new(
        store: Store,
        catalog: Arc<CatalogService>,
        event_tx: broadcast::Sender<LifecycleEvent>,
        default_tax_rate: Decimal,
    ) -> Self {
        Self {
            store,
            catalog,
            event_tx,
            default_tax_rate,
        }
    }

    /// Execute one action in its own transaction and broadcast its
    /// events after the commit.
    fn run(&self, action: &dyn OrderAction) -> EngineResult<ActionOutcome> {
        let txn = self.store.begin_write()?;
        let ctx = ActionContext::new(
            &txn,
            &self.store,
            &self.catalog,
            self.default_tax_rate,
            now_millis(),
        );
        let outcome = action.execute(&ctx)?;
        txn.commit().map_err(StoreError::from)?;

        for event in &outcome.events {
            let _ = self.event_tx.send(LifecycleEvent::new(event.clone()));
        }
        Ok(outcome)
    }

    // ========== Operations ==========

    pub fn open_order(&self, draft: OrderDraft) -> EngineResult<OrderSnapshot> {
        let outcome = self.run(&OpenOrderAction { draft })?;
        tracing::info!(
            order_id = outcome.order.id,
            order_no = %outcome.order.order_no,
            order_type = ?outcome.order.order_type,
            total = %outcome.order.total,
            "Order opened"
        );
        Ok(outcome.order)
    }

    pub fn add_lines(&self, order_id: i64, lines: Vec<LineInput>) -> EngineResult<OrderSnapshot> {
        let outcome = self.run(&AddLinesAction { order_id, lines })?;
        tracing::debug!(order_id, total = %outcome.order.total, "Lines added");
        Ok(outcome.order)
    }

    pub fn set_cart_discount(
        &self,
        order_id: i64,
        discount: Option<Discount>,
    ) -> EngineResult<OrderSnapshot> {
        let outcome = self.run(&SetCartDiscountAction { order_id, discount })?;
        tracing::debug!(order_id, total = %outcome.order.total, "Cart discount changed");
        Ok(outcome.order)
    }

    pub fn hold_order(&self, order_id: i64) -> EngineResult<OrderSnapshot> {
        let outcome = self.run(&HoldOrderAction { order_id })?;
        tracing::debug!(order_id, "Order held");
        Ok(outcome.order)
    }

    pub fn resume_order(&self, order_id: i64) -> EngineResult<OrderSnapshot> {
        let outcome = self.run(&ResumeOrderAction { order_id })?;
        tracing::debug!(order_id, "Order resumed");
        Ok(outcome.order)
    }

    /// Send undispatched lines to their prep stations. Returns the
    /// tickets created by this call; empty when nothing was owed.
    pub fn dispatch_tickets(&self, order_id: i64) -> EngineResult<Vec<KitchenTicket>> {
        let outcome = self.run(&DispatchTicketsAction { order_id })?;
        if outcome.tickets.is_empty() {
            tracing::debug!(order_id, "Dispatch requested, nothing owed");
        } else {
            tracing::info!(order_id, tickets = outcome.tickets.len(), "Tickets dispatched");
        }
        Ok(outcome.tickets)
    }

    pub fn record_payment(
        &self,
        order_id: i64,
        payment: PaymentInput,
    ) -> EngineResult<OrderSnapshot> {
        let outcome = self.run(&RecordPaymentAction { order_id, payment })?;
        tracing::debug!(
            order_id,
            paid = %outcome.order.paid_total(),
            total = %outcome.order.total,
            "Payment recorded"
        );
        Ok(outcome.order)
    }

    pub fn refund_payment(
        &self,
        order_id: i64,
        payment_id: i64,
        reason: Option<String>,
    ) -> EngineResult<OrderSnapshot> {
        let outcome = self.run(&RefundPaymentAction {
            order_id,
            payment_id,
            reason,
        })?;
        tracing::info!(order_id, payment_id, "Payment refunded");
        Ok(outcome.order)
    }

    /// Settle a pending order into an immutable sale.
    pub fn settle_order(&self, order_id: i64, allow_credit: bool) -> EngineResult<Sale> {
        let outcome = self.run(&SettleOrderAction {
            order_id,
            allow_credit,
        })?;
        // settle always fills the sale
        let sale = outcome.sale.ok_or(EngineError::NotFound {
            entity: Entity::Sale,
            id: order_id,
        })?;
        tracing::info!(
            order_id,
            receipt_number = %sale.receipt_number,
            total = %sale.total,
            "Order settled"
        );
        Ok(sale)
    }

    /// Compare payments to the total; a fully covered pending order
    /// settles on the spot.
    pub fn reconcile(&self, order_id: i64) -> EngineResult<Reconciliation> {
        let order = self.get_order(order_id)?;
        let paid = round2(order.paid_total());
        let dues = round2((order.total - paid).max(Decimal::ZERO));
        let change = round2((paid - order.total).max(Decimal::ZERO));

        let settled =
            order.status == OrderStatus::Pending && is_payment_sufficient(paid, order.total);
        if settled {
            self.settle_order(order_id, false)?;
        }
        Ok(Reconciliation {
            dues,
            change,
            settled,
        })
    }

    pub fn cancel_order(&self, order_id: i64) -> EngineResult<OrderSnapshot> {
        let outcome = self.run(&CancelOrderAction { order_id })?;
        tracing::info!(order_id, "Order cancelled");
        Ok(outcome.order)
    }

    /// Housekeeping delete for terminal orders. Removes the snapshot
    /// and its tickets in one transaction; sales always stay.
    pub fn purge_order(&self, order_id: i64) -> EngineResult<()> {
        let txn = self.store.begin_write()?;
        let order = self
            .store
            .get_order_txn(&txn, order_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Order,
                id: order_id,
            })?;
        if !order.status.is_terminal() {
            return Err(EngineError::OrderState {
                order_id,
                status: order.status,
                operation: "purge",
            });
        }
        let tickets_removed = self.store.remove_tickets_for_order(&txn, order_id)?;
        self.store.remove_order(&txn, order_id)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(order_id, tickets_removed, "Order purged");
        Ok(())
    }

    // ========== Queries ==========

    pub fn get_order(&self, order_id: i64) -> EngineResult<OrderSnapshot> {
        self.store.get_order(order_id)?.ok_or(EngineError::NotFound {
            entity: Entity::Order,
            id: order_id,
        })
    }

    /// Pending and held orders, via the active index.
    pub fn list_active(&self) -> EngineResult<Vec<OrderSnapshot>> {
        Ok(self.store.get_active_orders()?)
    }

    pub fn list_by_status(&self, status: OrderStatus) -> EngineResult<Vec<OrderSnapshot>> {
        Ok(self
            .store
            .get_all_orders()?
            .into_iter()
            .filter(|o| o.status == status)
            .collect())
    }

    pub fn get_sale(&self, sale_id: i64) -> EngineResult<Sale> {
        self.store.get_sale(sale_id)?.ok_or(EngineError::NotFound {
            entity: Entity::Sale,
            id: sale_id,
        })
    }

    pub fn find_sale_by_receipt(&self, receipt_number: &str) -> EngineResult<Option<Sale>> {
        Ok(self.store.find_sale_by_receipt(receipt_number)?)
    }

    /// Sales settled in `[from, to)` Unix milliseconds.
    pub fn list_sales_between(&self, from: i64, to: i64) -> EngineResult<Vec<Sale>> {
        Ok(self.store.list_sales_in_range(from, to)?)
    }
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("default_tax_rate", &self.default_tax_rate)
            .finish_non_exhaustive()
    }
}
