/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Convert a field target (`forms/0/name`) into the JSON pointer used to
/// read its value from a record (`/forms/0/name`).
pub fn record_pointer(target: &str) -> String {
    if target.starts_with('/') {
        target.to_string()
    } else {
        format!("/{target}")
    }
}
