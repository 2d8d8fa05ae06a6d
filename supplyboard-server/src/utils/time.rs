//! 时间工具函数: 业务时区转换
//!
//! 所有日期→时间戳转换统一在这里完成，过滤层只比较 `i64` Unix millis。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult, ErrorCode};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidDateRange,
            format!("Invalid date format: {}", date),
        )
        .with_detail("value", date)
    })
}

/// 解析时区名称 (IANA)，失败返回 None
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse().ok()
}

/// 本地时间 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
fn local_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 00:00:00.000 → Unix millis (业务时区，含)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    local_to_millis(date.and_time(NaiveTime::MIN), tz)
}

/// 日期结束 23:59:59.999 → Unix millis (业务时区，含)
///
/// 等于次日零点减 1 毫秒，调用方使用 `<= end` 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    match date.succ_opt() {
        Some(next_day) => day_start_millis(next_day, tz) - 1,
        None => i64::MAX,
    }
}
