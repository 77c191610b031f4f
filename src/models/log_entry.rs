//! Checkout log data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of transition recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogAction {
    #[serde(rename = "checkout")]
    CheckOut,
    #[serde(rename = "checkin")]
    CheckIn,
}

/// One immutable entry of the checkout log.
///
/// The key is referenced by a copy of its name, so the entry outlives the
/// key itself.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "0190f5c2-8a7e-7cc3-9b4e-2f1d3c4b5a69",
///   "keyName": "Main Office",
///   "action": "checkout",
///   "personName": "Alice",
///   "timestamp": "2025-12-20T10:00:00.000Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub key_name: String,
    pub action: LogAction,
    pub person_name: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Reason this entry could not have been written by a transition, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.key_name.trim().is_empty() {
            return Err(format!("log entry '{}' has a blank keyName", self.id));
        }
        if self.person_name.trim().is_empty() {
            return Err(format!("log entry '{}' has a blank personName", self.id));
        }
        Ok(())
    }
}

/// Query string for `GET /api/v1/logs`.
#[derive(Debug, Default, Deserialize)]
pub struct ListLogsQuery {
    /// Only entries for this key name
    pub key_name: Option<String>,

    /// At most this many entries, newest first
    pub limit: Option<usize>,
}

/// Response body for log entries.
#[derive(Debug, Serialize)]
pub struct LogEntryResponse {
    pub id: String,
    pub key_name: String,
    pub action: LogAction,
    pub person_name: String,
    pub timestamp: DateTime<Utc>,
}

impl From<LogEntry> for LogEntryResponse {
    fn from(entry: LogEntry) -> Self {
        Self {
            id: entry.id,
            key_name: entry.key_name,
            action: entry.action,
            person_name: entry.person_name,
            timestamp: entry.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        assert_eq!(
            serde_json::to_string(&LogAction::CheckOut).unwrap(),
            r#""checkout""#
        );
        assert_eq!(
            serde_json::from_str::<LogAction>(r#""checkin""#).unwrap(),
            LogAction::CheckIn
        );
        assert!(serde_json::from_str::<LogAction>(r#""CheckIn""#).is_err());
    }

    #[test]
    fn test_reads_entries_written_by_earlier_clients() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"id":"1718000000000","keyName":"Shed","action":"checkin",
                "personName":"Bob","timestamp":"2024-06-10T08:30:00.000Z"}"#,
        )
        .unwrap();

        assert_eq!(entry.key_name, "Shed");
        assert_eq!(entry.action, LogAction::CheckIn);
        assert_eq!(entry.person_name, "Bob");
    }
}
