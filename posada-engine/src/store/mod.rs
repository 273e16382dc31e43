//! redb-based storage layer for the lifecycle engine
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `resources` | `resource_id` | `Resource` | Tables and rooms |
//! | `products` | `product_id` | `Product` | Catalog items |
//! | `categories` | `category_id` | `Category` | Catalog categories |
//! | `bookings` | `booking_id` | `Booking` | Reservations |
//! | `occupancies` | `occupy_id` | `RoomOccupy` | Hotel stays |
//! | `orders` | `order_id` | `OrderSnapshot` | Order state |
//! | `active_orders` | `order_id` | `()` | Open order index |
//! | `tickets` | `ticket_id` | `KitchenTicket` | KOT/BOT slips |
//! | `sales` | `sale_id` | `Sale` | Settlement records (append-only) |
//! | `counters` | `name` | `i64` | Id and document-number counters |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: once `commit()` returns
//! the data survives power loss and the file is always in a consistent
//! state. Every engine operation runs inside one write transaction, so
//! multi-entity effects (order + table status + sale) are atomic.
//!
//! Values are JSON-serialized; keys are the `i64` entity ids handed
//! out by the counter table.

mod bookings;
mod catalog;
mod occupancies;
mod orders;
mod resources;
mod sales;
mod tickets;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const RESOURCES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("resources");
const PRODUCTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("products");
const CATEGORIES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("categories");
const BOOKINGS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("bookings");
const OCCUPANCIES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("occupancies");
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");
const ACTIVE_ORDERS_TABLE: TableDefinition<i64, ()> = TableDefinition::new("active_orders");
const TICKETS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("tickets");
const SALES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("sales");
const COUNTERS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Engine storage backed by redb
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open or create the database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an ephemeral in-memory database (tests, demo sessions).
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(RESOURCES_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(BOOKINGS_TABLE)?;
            let _ = write_txn.open_table(OCCUPANCIES_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(TICKETS_TABLE)?;
            let _ = write_txn.open_table(SALES_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction. redb is single-writer: concurrent
    /// operations serialize here, which is what makes read-then-write
    /// checks (booking overlap, table status) race-free.
    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Counters ==========

    fn bump_counter(&self, txn: &WriteTransaction, key: &str) -> StoreResult<i64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let next = table.get(key)?.map(|g| g.value()).unwrap_or(0) + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    /// Allocate the next id for an entity family, e.g. `next_id(txn, "order")`.
    pub fn next_id(&self, txn: &WriteTransaction, entity: &str) -> StoreResult<i64> {
        self.bump_counter(txn, &format!("id:{entity}"))
    }

    /// Bump a named document-number sequence, e.g. `next_seq(txn, "seq:FAC:20260823")`.
    pub fn next_seq(&self, txn: &WriteTransaction, key: &str) -> StoreResult<i64> {
        self.bump_counter(txn, key)
    }

    /// Current value of a counter without bumping it.
    pub fn current_counter(&self, key: &str) -> StoreResult<i64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table.get(key)?.map(|g| g.value()).unwrap_or(0))
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
