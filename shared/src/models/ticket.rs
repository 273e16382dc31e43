//! Kitchen Ticket Model - KOT/BOT dispatch slips

use serde::{Deserialize, Serialize};

/// Ticket kind: kitchen order ticket or bar order ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketKind {
    Kot,
    Bot,
}

/// Ticket status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Sent,
    Preparing,
    Ready,
    Cancelled,
}

impl TicketStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Ready | TicketStatus::Cancelled)
    }
}

/// A line on a ticket. Denormalized from the order line at dispatch
/// time and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketItem {
    pub name: String,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Kitchen ticket entity (厨打单)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitchenTicket {
    pub id: i64,
    /// Display number, e.g. `KOT-0042` / `BOT-0007`
    pub ticket_no: String,
    pub order_id: i64,
    pub order_no: String,
    pub kind: TicketKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    pub items: Vec<TicketItem>,
    pub status: TicketStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
