use std::path::PathBuf;
use std::sync::Arc;

use shared::event::LifecycleEvent;
use tokio::sync::broadcast;

use crate::bookings::BookingManager;
use crate::catalog::CatalogService;
use crate::core::Config;
use crate::core::error::EngineResult;
use crate::kitchen::TicketService;
use crate::locations::LocationRegistry;
use crate::occupancy::OccupancyTracker;
use crate::orders::OrdersManager;
use crate::store::{Store, StoreError};

/// 事件通道容量
///
/// Slow consumers fall behind and see `RecvError::Lagged`; the engine
/// never blocks on the channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// 引擎状态 - 持有所有组件的单例引用
///
/// Engine 是生命周期引擎的核心数据结构，持有所有组件的共享引用。
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 组件
///
/// | 组件 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Store | 嵌入式数据库 (redb) |
/// | catalog | Arc<CatalogService> | 商品目录缓存 |
/// | locations | LocationRegistry | 桌台/客房登记 |
/// | bookings | BookingManager | 预订管理 |
/// | occupancy | OccupancyTracker | 入住/退房 |
/// | orders | OrdersManager | 订单状态机 + 结算 |
/// | tickets | TicketService | 厨打票状态 |
///
/// # 使用示例
///
/// ```ignore
/// let engine = Engine::initialize(Config::from_env())?;
/// let mut events = engine.subscribe();
///
/// let order = engine.orders().open_order(draft)?;
/// ```
#[derive(Clone)]
pub struct Engine {
    config: Config,
    store: Store,
    catalog: Arc<CatalogService>,
    locations: LocationRegistry,
    bookings: BookingManager,
    occupancy: OccupancyTracker,
    orders: OrdersManager,
    tickets: TicketService,
    event_tx: broadcast::Sender<LifecycleEvent>,
}

impl Engine {
    /// 初始化引擎
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (确保目录存在)
    /// 2. 数据库 (work_dir/posada.redb)
    /// 3. 各组件 (Catalog, Locations, Bookings, Occupancy, Orders, Tickets)
    pub fn initialize(config: Config) -> EngineResult<Self> {
        // 0. Ensure work_dir exists
        config.ensure_work_dir().map_err(StoreError::from)?;

        // 1. Open the store
        let store = Store::open(config.db_path())?;

        Self::assemble(config, store)
    }

    /// 初始化内存引擎 (测试、演示场景)
    ///
    /// 数据不落盘，进程退出即丢失。
    pub fn initialize_in_memory(config: Config) -> EngineResult<Self> {
        let store = Store::open_in_memory()?;
        Self::assemble(config, store)
    }

    fn assemble(config: Config, store: Store) -> EngineResult<Self> {
        // 2. One broadcast channel shared by every component
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        // 3. Components, wired by constructor injection
        let catalog = Arc::new(CatalogService::new(store.clone()));
        catalog.warmup()?;

        let locations = LocationRegistry::new(store.clone());
        let bookings = BookingManager::new(
            store.clone(),
            event_tx.clone(),
            config.reservation_lead_minutes,
        );
        let occupancy = OccupancyTracker::new(
            store.clone(),
            event_tx.clone(),
            config.reservation_lead_minutes,
        );
        let orders = OrdersManager::new(
            store.clone(),
            catalog.clone(),
            event_tx.clone(),
            config.default_tax_rate,
        );
        let tickets = TicketService::new(store.clone(), event_tx.clone());

        tracing::info!(
            environment = %config.environment,
            tax_rate = %config.default_tax_rate,
            "🚀 Engine initialized"
        );

        Ok(Self {
            config,
            store,
            catalog,
            locations,
            bookings,
            occupancy,
            orders,
            tickets,
            event_tx,
        })
    }

    /// 订阅引擎事件
    ///
    /// 每个订阅者获得独立的接收端；事件在事务提交后进入通道。
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.event_tx.subscribe()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// 获取存储层 (诊断、备份工具使用)
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn catalog(&self) -> &Arc<CatalogService> {
        &self.catalog
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    pub fn bookings(&self) -> &BookingManager {
        &self.bookings
    }

    pub fn occupancy(&self) -> &OccupancyTracker {
        &self.occupancy
    }

    pub fn orders(&self) -> &OrdersManager {
        &self.orders
    }

    pub fn tickets(&self) -> &TicketService {
        &self.tickets
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("environment", &self.config.environment)
            .field("work_dir", &self.config.work_dir)
            .finish_non_exhaustive()
    }
}
