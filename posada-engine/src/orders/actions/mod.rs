//! Order actions - one struct per operation
//!
//! Every action runs inside the manager's write transaction and
//! leaves totals recomputed before the snapshot is stored.

mod add_lines;
mod cancel_order;
mod dispatch_tickets;
mod hold_resume;
mod open_order;
mod record_payment;
mod refund_payment;
mod set_cart_discount;
mod settle_order;

pub use add_lines::AddLinesAction;
pub use cancel_order::CancelOrderAction;
pub use dispatch_tickets::DispatchTicketsAction;
pub use hold_resume::{HoldOrderAction, ResumeOrderAction};
pub use open_order::OpenOrderAction;
pub use record_payment::RecordPaymentAction;
pub use refund_payment::RefundPaymentAction;
pub use set_cart_discount::SetCartDiscountAction;
pub use settle_order::SettleOrderAction;

use rust_decimal::Decimal;
use shared::models::{PrepArea, Product};
use shared::order::{LineInput, LineSnapshot};

/// Denormalize a catalog product into an order line. Name, price and
/// prep area are frozen here; `line_total` is filled by the totals
/// pass. Lines without a prep area never join kitchen dispatch.
pub(crate) fn line_from_input(line_no: u32, product: &Product, input: &LineInput) -> LineSnapshot {
    LineSnapshot {
        line_no,
        product_id: product.id,
        name: product.name.clone(),
        unit_price: product.price,
        quantity: input.quantity,
        discount: input.discount,
        line_total: Decimal::ZERO,
        prep_area: product.prep_area,
        dispatch_selected: input.dispatch.unwrap_or(product.prep_area != PrepArea::None),
        ticketed: false,
        note: input.note.clone(),
    }
}
