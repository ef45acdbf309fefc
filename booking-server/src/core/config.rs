use chrono_tz::Tz;

/// Engine configuration
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DB_PATH | /var/lib/booking/booking.db | SQLite 数据库路径 |
/// | MAX_BOOKING_HOURS | 12 | 单次预订最长时长(小时) |
/// | BUSINESS_TIMEZONE | UTC | 业务时区 |
/// | ENVIRONMENT | development | 运行环境 |
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path
    pub db_path: String,
    /// Maximum total duration of one booking, in hours
    pub max_booking_hours: i64,
    /// Business timezone used to interpret calendar dates and wall-clock
    /// times; stored timestamps are always UTC millis
    pub business_timezone: Tz,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("DB_PATH")
                .unwrap_or_else(|_| "/var/lib/booking/booking.db".into()),
            max_booking_hours: std::env::var("MAX_BOOKING_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            business_timezone: std::env::var("BUSINESS_TIMEZONE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Tz::UTC),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(db_path: impl Into<String>, max_booking_hours: i64) -> Self {
        let mut config = Self::from_env();
        config.db_path = db_path.into();
        config.max_booking_hours = max_booking_hours;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
