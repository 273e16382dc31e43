//! Posada Engine - order, booking and payment lifecycle core
//!
//! # 架构概述
//!
//! Embedded lifecycle engine for a combined restaurant + hotel
//! business. Hosts (HTTP layer, desktop shell) drive it through the
//! component managers; every mutating operation runs inside one
//! storage transaction and broadcasts a [`LifecycleEvent`] after
//! commit.
//!
//! # 模块结构
//!
//! ```text
//! posada-engine/src/
//! ├── core/          # 配置、错误、引擎装配
//! ├── store/         # redb 存储层
//! ├── catalog        # 商品目录缓存
//! ├── locations      # 桌台/客房登记
//! ├── bookings       # 预订
//! ├── occupancy      # 入住/退房
//! ├── orders/        # 订单状态机 + 结算
//! ├── kitchen        # 厨打票派发
//! └── money          # 金额规则
//! ```

pub mod bookings;
pub mod catalog;
pub mod core;
pub mod kitchen;
pub mod locations;
pub mod money;
pub mod occupancy;
pub mod orders;
pub mod store;

// Re-export 公共类型
pub use bookings::BookingManager;
pub use catalog::CatalogService;
pub use core::{Config, Engine, EngineError, EngineResult, Entity, ErrorKind};
pub use kitchen::TicketService;
pub use locations::LocationRegistry;
pub use occupancy::OccupancyTracker;
pub use orders::{OrdersManager, Reconciliation};
pub use shared::event::{EventPayload, LifecycleEvent};
pub use store::{Store, StoreError, StoreResult};
