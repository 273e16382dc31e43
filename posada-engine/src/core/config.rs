use rust_decimal::Decimal;
use std::path::PathBuf;

/// 引擎配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | POSADA_WORK_DIR | /var/lib/posada | 工作目录 |
/// | POSADA_ENV | development | 运行环境 |
/// | POSADA_TAX_RATE | 0.21 | 默认税率 (IVA) |
/// | POSADA_RESERVATION_LEAD_MIN | 120 | 预订前置保留时间(分钟) |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库文件
    pub work_dir: String,
    /// 运行环境: development | production
    pub environment: String,
    /// Fraction applied when an order draft omits its rate (0.21 = 21% IVA)
    pub default_tax_rate: Decimal,
    /// Minutes before a pending/confirmed booking during which a freed
    /// room parks on Reserved instead of Available
    pub reservation_lead_minutes: i64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("POSADA_WORK_DIR").unwrap_or_else(|_| "/var/lib/posada".into()),
            environment: std::env::var("POSADA_ENV").unwrap_or_else(|_| "development".into()),
            default_tax_rate: std::env::var("POSADA_TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Decimal::new(21, 2)),
            reservation_lead_minutes: std::env::var("POSADA_RESERVATION_LEAD_MIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }

    /// 使用自定义工作目录覆盖配置，常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("posada.redb")
    }

    /// 确保工作目录存在
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        !self.is_production()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
