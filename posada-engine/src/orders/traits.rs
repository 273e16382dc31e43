//! Action plumbing shared by every order operation
//!
//! Each operation is a small action struct executed by the manager
//! inside one write transaction. Actions read and write through the
//! context, return the updated snapshot plus the events to broadcast,
//! and never commit themselves.

use crate::catalog::CatalogService;
use crate::core::error::{EngineError, EngineResult, Entity};
use crate::store::Store;
use redb::WriteTransaction;
use rust_decimal::Decimal;
use shared::event::EventPayload;
use shared::models::{KitchenTicket, Sale};
use shared::order::{OrderSnapshot, OrderStatus};

/// Everything an action may touch while its transaction is open.
pub struct ActionContext<'a> {
    pub txn: &'a WriteTransaction,
    pub store: &'a Store,
    pub catalog: &'a CatalogService,
    /// Applied when the order carries no explicit rate
    pub default_tax_rate: Decimal,
    pub now: i64,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        txn: &'a WriteTransaction,
        store: &'a Store,
        catalog: &'a CatalogService,
        default_tax_rate: Decimal,
        now: i64,
    ) -> Self {
        Self {
            txn,
            store,
            catalog,
            default_tax_rate,
            now,
        }
    }

    pub fn load_order(&self, order_id: i64) -> EngineResult<OrderSnapshot> {
        self.store
            .get_order_txn(self.txn, order_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Order,
                id: order_id,
            })
    }

    /// Next order number, e.g. `PED2026082310001`. One sequence per
    /// business day; allocated inside the action's transaction so a
    /// rolled-back order never burns a number.
    pub fn next_order_number(&self) -> EngineResult<String> {
        let date = shared::util::date_stamp();
        let seq = self.store.next_seq(self.txn, &format!("seq:PED:{date}"))?;
        Ok(format!("PED{}{}", date, 10000 + seq))
    }

    /// Next receipt number, e.g. `FAC2026082310001`.
    pub fn next_receipt_number(&self) -> EngineResult<String> {
        let date = shared::util::date_stamp();
        let seq = self.store.next_seq(self.txn, &format!("seq:FAC:{date}"))?;
        Ok(format!("FAC{}{}", date, 10000 + seq))
    }

    /// Next ticket number for a kind, e.g. `KOT-0042` / `BOT-0007`.
    pub fn next_ticket_number(&self, kind: shared::models::TicketKind) -> EngineResult<String> {
        let (key, prefix) = crate::kitchen::ticket_series(kind);
        let seq = self.store.next_seq(self.txn, key)?;
        Ok(format!("{prefix}-{seq:04}"))
    }
}

/// What an action produced. Tickets and sale are filled only by the
/// actions that create them.
#[derive(Debug)]
pub struct ActionOutcome {
    pub order: OrderSnapshot,
    pub events: Vec<EventPayload>,
    pub tickets: Vec<KitchenTicket>,
    pub sale: Option<Sale>,
}

impl ActionOutcome {
    pub fn new(order: OrderSnapshot) -> Self {
        Self {
            order,
            events: Vec::new(),
            tickets: Vec::new(),
            sale: None,
        }
    }

    pub fn with_event(order: OrderSnapshot, event: EventPayload) -> Self {
        Self {
            order,
            events: vec![event],
            tickets: Vec::new(),
            sale: None,
        }
    }
}

/// One order operation, run inside the manager's transaction.
pub trait OrderAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome>;
}

/// Guard an operation against the order's current status.
pub(crate) fn require_status(
    order: &OrderSnapshot,
    allowed: &[OrderStatus],
    operation: &'static str,
) -> EngineResult<()> {
    if allowed.contains(&order.status) {
        return Ok(());
    }
    Err(EngineError::OrderState {
        order_id: order.id,
        status: order.status,
        operation,
    })
}
