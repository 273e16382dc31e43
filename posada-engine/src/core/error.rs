//! Engine error taxonomy
//!
//! Fine-grained variants carry the offending entity id; [`ErrorKind`]
//! groups them into the coarse classes callers branch on. Storage
//! faults pass through unchanged as `Internal`.

use crate::store::StoreError;
use rust_decimal::Decimal;
use shared::models::{BookingStatus, ResourceKind, TicketStatus};
use shared::order::OrderStatus;
use thiserror::Error;

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Capacity,
    InvalidTransition,
    NotActive,
    OutstandingBalance,
    NotFound,
    Internal,
}

/// Entity names used in not-found errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Product,
    Category,
    Resource,
    Booking,
    Occupancy,
    Order,
    Payment,
    Ticket,
    Sale,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Product => "Product",
            Entity::Category => "Category",
            Entity::Resource => "Resource",
            Entity::Booking => "Booking",
            Entity::Occupancy => "Occupancy",
            Entity::Order => "Order",
            Entity::Payment => "Payment",
            Entity::Ticket => "Ticket",
            Entity::Sale => "Sale",
        };
        write!(f, "{name}")
    }
}

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    // ========== Validation ==========
    #[error("Order must contain at least one line")]
    EmptyOrder,

    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: i64, quantity: i32 },

    #[error("Invalid guest count: {0}")]
    InvalidGuestCount(i32),

    #[error("Invalid price: {0}")]
    InvalidPrice(Decimal),

    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Invalid discount value: {0}")]
    InvalidDiscount(Decimal),

    #[error("Invalid tax rate: {0}")]
    InvalidTaxRate(Decimal),

    #[error("Tendered {tendered} is below payment amount {amount}")]
    TenderedBelowAmount { tendered: Decimal, amount: Decimal },

    #[error("Product {product_id} is not sellable")]
    ProductNotSellable { product_id: i64 },

    #[error("Resource {resource_id} is not a {expected:?}")]
    WrongResourceKind {
        resource_id: i64,
        expected: ResourceKind,
    },

    #[error("Booking window start must precede end")]
    InvalidWindow,

    #[error("Dine-in orders require a table")]
    TableRequired,

    #[error("Room service orders require a room")]
    RoomRequired,

    #[error("Payment {payment_id} on order {order_id} is not refundable")]
    PaymentNotRefundable { order_id: i64, payment_id: i64 },

    // ========== Conflict ==========
    #[error("Table {table_id} is not available")]
    TableUnavailable { table_id: i64 },

    #[error("Room {room_id} is not available")]
    RoomUnavailable { room_id: i64 },

    #[error("Booking window on resource {resource_id} overlaps booking {booking_id}")]
    BookingOverlap { resource_id: i64, booking_id: i64 },

    // ========== Capacity ==========
    #[error("Party of {party_size} exceeds capacity {capacity} of resource {resource_id}")]
    OverCapacity {
        resource_id: i64,
        capacity: i32,
        party_size: i32,
    },

    // ========== Invalid transition ==========
    #[error("Order {order_id} is {status:?}; cannot {operation}")]
    OrderState {
        order_id: i64,
        status: OrderStatus,
        operation: &'static str,
    },

    #[error("Booking {booking_id}: illegal transition {from:?} -> {to:?}")]
    BookingTransition {
        booking_id: i64,
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Ticket {ticket_id}: illegal transition {from:?} -> {to:?}")]
    TicketTransition {
        ticket_id: i64,
        from: TicketStatus,
        to: TicketStatus,
    },

    // ========== Not active ==========
    #[error("Occupancy {occupy_id} is not active")]
    OccupancyNotActive { occupy_id: i64 },

    #[error("No active occupancy for room {room_id}")]
    NoActiveOccupancy { room_id: i64 },

    // ========== Outstanding balance ==========
    #[error("Occupancy {occupy_id} has outstanding balance {balance}")]
    OutstandingBalance { occupy_id: i64, balance: Decimal },

    #[error("Order {order_id}: payments {paid} do not cover total {total}")]
    InsufficientPayment {
        order_id: i64,
        paid: Decimal,
        total: Decimal,
    },

    // ========== Not found ==========
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    // ========== Internal ==========
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        EngineError::NotFound { entity, id }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::EmptyOrder
            | EngineError::InvalidQuantity { .. }
            | EngineError::InvalidGuestCount(_)
            | EngineError::InvalidPrice(_)
            | EngineError::InvalidAmount(_)
            | EngineError::InvalidDiscount(_)
            | EngineError::InvalidTaxRate(_)
            | EngineError::TenderedBelowAmount { .. }
            | EngineError::ProductNotSellable { .. }
            | EngineError::WrongResourceKind { .. }
            | EngineError::InvalidWindow
            | EngineError::TableRequired
            | EngineError::RoomRequired
            | EngineError::PaymentNotRefundable { .. } => ErrorKind::Validation,

            EngineError::TableUnavailable { .. }
            | EngineError::RoomUnavailable { .. }
            | EngineError::BookingOverlap { .. } => ErrorKind::Conflict,

            EngineError::OverCapacity { .. } => ErrorKind::Capacity,

            EngineError::OrderState { .. }
            | EngineError::BookingTransition { .. }
            | EngineError::TicketTransition { .. } => ErrorKind::InvalidTransition,

            EngineError::OccupancyNotActive { .. } | EngineError::NoActiveOccupancy { .. } => {
                ErrorKind::NotActive
            }

            EngineError::OutstandingBalance { .. } | EngineError::InsufficientPayment { .. } => {
                ErrorKind::OutstandingBalance
            }

            EngineError::NotFound { .. } => ErrorKind::NotFound,

            EngineError::Store(_) => ErrorKind::Internal,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
