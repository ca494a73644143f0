//! 时间工具函数
//!
//! 预约日期/时间的解析与校验统一在这里完成，
//! 所有存储时间均为 UTC。

use chrono::{NaiveDate, NaiveTime, Utc};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

/// 验证日期不在过去
pub fn validate_not_past(date: NaiveDate) -> AppResult<()> {
    let today = Utc::now().date_naive();
    if date < today {
        return Err(AppError::validation(format!(
            "Date {} is in the past (today is {})",
            date, today
        )));
    }
    Ok(())
}
