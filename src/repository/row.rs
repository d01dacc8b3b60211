// ==========================================
// 奶牛场管理系统 - 行映射辅助
// ==========================================
// 职责: TEXT 列 ↔ chrono 日期/封闭枚举 的统一转换
// 说明: 枚举解析失败按转换错误上抛，不做静默默认值
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

fn conversion_err(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, msg)),
    )
}

/// 读取 NaiveDate 列（ISO "%Y-%m-%d"）
pub(crate) fn date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(idx)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|e| conversion_err(idx, format!("无效日期 '{}': {}", s, e)))
}

/// 读取可空 NaiveDate 列
pub(crate) fn date_col_opt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| conversion_err(idx, format!("无效日期 '{}': {}", s, e))),
        None => Ok(None),
    }
}

/// 读取 DateTime<Utc> 列（RFC3339）
pub(crate) fn datetime_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, format!("无效时间 '{}': {}", s, e)))
}

/// 读取封闭枚举列
pub(crate) fn enum_col<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    parse(&s).ok_or_else(|| conversion_err(idx, format!("无效枚举值 '{}'", s)))
}

/// 读取可空封闭枚举列
pub(crate) fn enum_col_opt<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<Option<T>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(s) => parse(&s)
            .map(Some)
            .ok_or_else(|| conversion_err(idx, format!("无效枚举值 '{}'", s))),
        None => Ok(None),
    }
}
