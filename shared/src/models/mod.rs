//! Data models
//!
//! Shared between the engine and satellite crates.
//! All IDs are `i64`, allocated by the engine's counter table.
//! Monetary fields are `rust_decimal::Decimal` with 2-digit scale,
//! serialized as exact decimal strings.

pub mod booking;
pub mod category;
pub mod occupancy;
pub mod product;
pub mod resource;
pub mod sale;
pub mod ticket;

// Re-exports
pub use booking::*;
pub use category::*;
pub use occupancy::*;
pub use product::*;
pub use resource::*;
pub use sale::*;
pub use ticket::*;
