/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Local calendar date as `YYYYMMDD`, used for document numbering.
pub fn date_stamp() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}
