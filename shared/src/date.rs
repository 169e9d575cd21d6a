//! 时间类型模块
//!
//! 后端返回的时间字符串格式并不固定（RFC 3339、RFC 2822 或不带时区的
//! `YYYY-MM-DD HH:MM:SS`），此模块负责统一解析并按本地时区格式化。

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// 无法解析时的显示文本
pub const INVALID_DATE: &str = "Invalid Date";

const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// 已解析的时间点（内部以 UTC 保存）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// 解析后端时间字符串
    ///
    /// 不带时区的时间按本地时区解释。返回 None 如果解析失败
    pub fn parse(s: &str) -> Option<Self> {
        Self::parse_with(s, &Local)
    }

    /// 与 [`Timestamp::parse`] 相同，但由调用方指定无时区时间的解释时区
    pub fn parse_with<Tz: TimeZone>(s: &str, naive_zone: &Tz) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .and_then(|naive| naive_zone.from_local_datetime(&naive).earliest())
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// 按指定时区格式化
    pub fn format_in<Tz: TimeZone>(&self, zone: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        self.0.with_timezone(zone).format(DISPLAY_FORMAT).to_string()
    }

    /// 按本地时区格式化
    pub fn to_local_string(&self) -> String {
        self.format_in(&Local)
    }
}

/// 解析并格式化为本地时间；失败时返回 `Invalid Date`
pub fn format_local(raw: &str) -> String {
    Timestamp::parse(raw)
        .map(|ts| ts.to_local_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}
