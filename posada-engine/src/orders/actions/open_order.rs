//! OpenOrder action
//!
//! Creates a pending order from a draft, binding the table or room
//! the order type requires.

use super::line_from_input;
use crate::core::error::{EngineError, EngineResult, Entity};
use crate::money;
use crate::orders::traits::{ActionContext, ActionOutcome, OrderAction};
use rust_decimal::Decimal;
use shared::event::EventPayload;
use shared::models::{ResourceKind, ResourceStatus};
use shared::order::{OrderDraft, OrderSnapshot, OrderStatus, OrderType};

#[derive(Debug, Clone)]
pub struct OpenOrderAction {
    pub draft: OrderDraft,
}

impl OrderAction for OpenOrderAction {
    fn execute(&self, ctx: &ActionContext<'_>) -> EngineResult<ActionOutcome> {
        let draft = &self.draft;

        // 1. Validate the draft shape
        if draft.lines.is_empty() {
            return Err(EngineError::EmptyOrder);
        }
        if draft.guest_count <= 0 {
            return Err(EngineError::InvalidGuestCount(draft.guest_count));
        }
        for line in &draft.lines {
            money::validate_line(line)?;
        }
        if let Some(discount) = &draft.cart_discount {
            money::validate_discount(discount)?;
        }
        let tax_rate = match draft.tax_rate {
            Some(rate) => {
                money::validate_tax_rate(rate)?;
                rate
            }
            None => ctx.default_tax_rate,
        };

        // 2. Freeze catalog data into line snapshots
        let mut lines = Vec::with_capacity(draft.lines.len());
        for (idx, input) in draft.lines.iter().enumerate() {
            let product = ctx.catalog.require_sellable(input.product_id)?;
            lines.push(line_from_input(idx as u32 + 1, &product, input));
        }

        // 3. Bind the resource the order type requires
        let mut table_name = None;
        let mut occupy_id = None;
        match draft.order_type {
            OrderType::DineIn => {
                let table_id = draft.table_id.ok_or(EngineError::TableRequired)?;
                let mut table = ctx
                    .store
                    .get_resource_txn(ctx.txn, table_id)?
                    .ok_or(EngineError::NotFound {
                        entity: Entity::Resource,
                        id: table_id,
                    })?;
                if table.kind != ResourceKind::Table {
                    return Err(EngineError::WrongResourceKind {
                        resource_id: table_id,
                        expected: ResourceKind::Table,
                    });
                }
                // status check plus index check: a table whose status
                // drifted to Available while an order still holds it
                // stays blocked
                if !table.is_available()
                    || ctx
                        .store
                        .find_active_order_for_table_txn(ctx.txn, table_id)?
                        .is_some()
                {
                    return Err(EngineError::TableUnavailable { table_id });
                }
                table.status = ResourceStatus::Occupied;
                ctx.store.put_resource(ctx.txn, &table)?;
                table_name = Some(table.name);
            }
            OrderType::RoomService => {
                let room_id = draft.room_id.ok_or(EngineError::RoomRequired)?;
                let room = ctx
                    .store
                    .get_resource_txn(ctx.txn, room_id)?
                    .ok_or(EngineError::NotFound {
                        entity: Entity::Resource,
                        id: room_id,
                    })?;
                if room.kind != ResourceKind::Room {
                    return Err(EngineError::WrongResourceKind {
                        resource_id: room_id,
                        expected: ResourceKind::Room,
                    });
                }
                // bill lands on the folio, so a live stay is required
                let occupancy = ctx
                    .store
                    .find_active_occupancy_for_room_txn(ctx.txn, room_id)?
                    .ok_or(EngineError::NoActiveOccupancy { room_id })?;
                occupy_id = Some(occupancy.id);
                table_name = Some(room.name);
            }
            OrderType::Takeaway | OrderType::Delivery => {}
        }

        // 4. Allocate id and document number inside this transaction
        let id = ctx.store.next_id(ctx.txn, "order")?;
        let order_no = ctx.next_order_number()?;

        // 5. Assemble and price the snapshot
        let mut order = OrderSnapshot {
            id,
            order_no,
            order_type: draft.order_type,
            customer_id: draft.customer_id,
            table_id: if draft.order_type == OrderType::DineIn {
                draft.table_id
            } else {
                None
            },
            table_name,
            room_id: if draft.order_type == OrderType::RoomService {
                draft.room_id
            } else {
                None
            },
            occupy_id,
            guest_count: draft.guest_count,
            lines,
            cart_discount: draft.cart_discount,
            tax_rate,
            subtotal: Decimal::ZERO,
            discount_total: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            payments: Vec::new(),
            status: OrderStatus::Pending,
            kot_sent: false,
            note: draft.note.clone(),
            created_at: ctx.now,
            updated_at: ctx.now,
            settled_at: None,
        };
        money::recalculate_totals(&mut order);

        // 6. Persist and index as active
        ctx.store.store_order(ctx.txn, &order)?;
        ctx.store.mark_order_active(ctx.txn, order.id)?;

        let event = EventPayload::OrderOpened {
            order_id: order.id,
            order_no: order.order_no.clone(),
            order_type: order.order_type,
            table_id: order.table_id,
        };
        Ok(ActionOutcome::with_event(order, event))
    }
}
