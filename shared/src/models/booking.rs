//! Booking Model - advance reservations for tables and rooms

use serde::{Deserialize, Serialize};

/// Booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Terminal bookings never block a new reservation.
    pub fn blocks_window(&self) -> bool {
        !matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::Completed | BookingStatus::NoShow
        )
    }
}

/// Half-open reservation window `[start_at, end_at)` in Unix milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingWindow {
    pub start_at: i64,
    pub end_at: i64,
}

impl BookingWindow {
    pub fn new(start_at: i64, end_at: i64) -> Self {
        Self { start_at, end_at }
    }

    pub fn is_valid(&self) -> bool {
        self.start_at < self.end_at
    }

    /// Two half-open windows overlap iff `s1 < e2 && s2 < e1`.
    /// Back-to-back windows (end == start) do not overlap.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start_at < other.end_at && other.start_at < self.end_at
    }
}

/// Booking entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub resource_id: i64,
    pub customer_id: i64,
    pub party_size: i32,
    pub window: BookingWindow,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub resource_id: i64,
    pub customer_id: i64,
    pub party_size: i32,
    pub window: BookingWindow,
    pub note: Option<String>,
}
