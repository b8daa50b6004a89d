use chrono::Utc;

/// Current Unix time in whole seconds.
pub fn epoch_seconds() -> i64 {
    Utc::now().timestamp()
}
