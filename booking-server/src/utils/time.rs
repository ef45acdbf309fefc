//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 manager 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::NaiveDate;
use chrono_tz::Tz;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
}

/// 日期 + 时分 → Unix millis (业务时区)
///
/// Returns None on an out-of-range hour/minute.
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hm_to_millis(date: NaiveDate, hour: u32, min: u32, tz: Tz) -> Option<i64> {
    let naive = date.and_hms_opt(hour, min, 0)?;
    Some(
        naive
            .and_local_timezone(tz)
            .latest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| naive.and_utc().timestamp_millis()),
    )
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hm_to_millis(date, 0, 0, tz).unwrap_or_default()
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hm_to_millis(next_day, 0, 0, tz).unwrap_or_default()
}

/// Canonical clock, injected into the manager so expiry and extension
/// logic stay deterministic under test.
///
/// `Clock::system()` reads the wall clock; `Clock::fixed(millis)` pins
/// the current time and can be advanced from tests.
#[derive(Debug, Clone)]
pub struct Clock {
    fixed: Option<Arc<AtomicI64>>,
}

impl Clock {
    pub fn system() -> Self {
        Self { fixed: None }
    }

    pub fn fixed(millis: i64) -> Self {
        Self {
            fixed: Some(Arc::new(AtomicI64::new(millis))),
        }
    }

    /// Current time in Unix millis (UTC)
    pub fn now_millis(&self) -> i64 {
        match &self.fixed {
            Some(fixed) => fixed.load(Ordering::SeqCst),
            None => shared::util::now_millis(),
        }
    }

    /// Advance a fixed clock; no-op on the system clock
    pub fn advance(&self, millis: i64) {
        if let Some(fixed) = &self.fixed {
            fixed.fetch_add(millis, Ordering::SeqCst);
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}
