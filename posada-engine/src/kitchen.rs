//! Kitchen dispatch - KOT/BOT derivation and ticket status tracking
//!
//! Ticket derivation is a pure function over an order snapshot so the
//! dispatch action can run it inside its own transaction. Lines that
//! already sit on a ticket are never re-sent.

use crate::core::error::{EngineError, EngineResult, Entity};
use crate::store::{Store, StoreError};
use shared::event::{EventPayload, LifecycleEvent};
use shared::models::product::PrepArea;
use shared::models::{KitchenTicket, TicketItem, TicketKind, TicketStatus};
use shared::order::OrderSnapshot;
use shared::util::now_millis;
use tokio::sync::broadcast;

/// Group the order's undispatched lines into ticket drafts, one per
/// prep area. Returns an empty list when nothing is owed.
pub(crate) fn ticket_groups(order: &OrderSnapshot) -> Vec<(TicketKind, Vec<TicketItem>)> {
    let mut kitchen = Vec::new();
    let mut bar = Vec::new();
    for line in order.lines.iter().filter(|l| l.needs_dispatch()) {
        let item = TicketItem {
            name: line.name.clone(),
            quantity: line.quantity,
            note: line.note.clone(),
        };
        match line.prep_area {
            PrepArea::Kitchen => kitchen.push(item),
            PrepArea::Bar => bar.push(item),
            PrepArea::None => {}
        }
    }

    let mut groups = Vec::new();
    if !kitchen.is_empty() {
        groups.push((TicketKind::Kot, kitchen));
    }
    if !bar.is_empty() {
        groups.push((TicketKind::Bot, bar));
    }
    groups
}

/// Counter key and number prefix for a ticket kind.
pub(crate) fn ticket_series(kind: TicketKind) -> (&'static str, &'static str) {
    match kind {
        TicketKind::Kot => ("seq:KOT", "KOT"),
        TicketKind::Bot => ("seq:BOT", "BOT"),
    }
}

fn transition_allowed(from: TicketStatus, to: TicketStatus) -> bool {
    use TicketStatus::*;
    matches!(
        (from, to),
        (Sent, Preparing) | (Preparing, Ready) | (Sent, Cancelled) | (Preparing, Cancelled)
    )
}

/// Read/advance kitchen tickets after dispatch.
#[derive(Clone)]
pub struct TicketService {
    store: Store,
    event_tx: broadcast::Sender<LifecycleEvent>,
}

impl TicketService {
    pub fn new(store: Store, event_tx: broadcast::Sender<LifecycleEvent>) -> Self {
        Self { store, event_tx }
    }

    /// Advance one ticket: `Sent -> Preparing -> Ready`, or cancel
    /// from any non-terminal state.
    pub fn update_status(
        &self,
        ticket_id: i64,
        new_status: TicketStatus,
    ) -> EngineResult<KitchenTicket> {
        let txn = self.store.begin_write()?;

        let mut ticket = self
            .store
            .get_ticket_txn(&txn, ticket_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Ticket,
                id: ticket_id,
            })?;

        if !transition_allowed(ticket.status, new_status) {
            return Err(EngineError::TicketTransition {
                ticket_id,
                from: ticket.status,
                to: new_status,
            });
        }

        ticket.status = new_status;
        ticket.updated_at = now_millis();
        self.store.store_ticket(&txn, &ticket)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::debug!(ticket_id, status = ?new_status, "Ticket status updated");
        let _ = self
            .event_tx
            .send(LifecycleEvent::new(EventPayload::TicketStatusChanged {
                ticket_id,
                status: new_status,
            }));
        Ok(ticket)
    }

    pub fn get(&self, ticket_id: i64) -> EngineResult<KitchenTicket> {
        self.store
            .get_ticket(ticket_id)?
            .ok_or(EngineError::NotFound {
                entity: Entity::Ticket,
                id: ticket_id,
            })
    }

    pub fn list_for_order(&self, order_id: i64) -> EngineResult<Vec<KitchenTicket>> {
        Ok(self.store.list_tickets_for_order(order_id)?)
    }

    /// Tickets the kitchen still has in hand (sent or preparing).
    pub fn list_open(&self) -> EngineResult<Vec<KitchenTicket>> {
        Ok(self.store.list_open_tickets()?)
    }
}

impl std::fmt::Debug for TicketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketService").finish_non_exhaustive()
    }
}
