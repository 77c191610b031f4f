//! Key data models and API request/response types.
//!
//! This module defines:
//! - `Key`: Domain entity representing one physical key
//! - `StoredKey`: The flat record persisted in the `keys` blob
//! - Request and response bodies for the key endpoints

use super::log_entry::LogEntryResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current state of a key.
///
/// The holder and checkout time only exist inside `CheckedOut`, so a key
/// cannot carry one without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Available,
    CheckedOut {
        /// Person currently holding the key
        holder: String,
        /// When the key was checked out
        since: DateTime<Utc>,
    },
}

/// One physical key tracked by the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Unique identifier, assigned at creation and never changed
    pub id: String,

    /// Human-readable label, e.g. "Main Office"
    pub name: String,

    /// Default storage place, e.g. "Bldg A"
    pub location: String,

    pub status: KeyStatus,
}

impl Key {
    /// New key in the `Available` state.
    pub fn new(id: String, name: String, location: String) -> Self {
        Self {
            id,
            name,
            location,
            status: KeyStatus::Available,
        }
    }

    pub fn is_checked_out(&self) -> bool {
        matches!(self.status, KeyStatus::CheckedOut { .. })
    }

    pub fn holder(&self) -> Option<&str> {
        match &self.status {
            KeyStatus::CheckedOut { holder, .. } => Some(holder),
            KeyStatus::Available => None,
        }
    }

    pub fn checked_out_at(&self) -> Option<DateTime<Utc>> {
        match &self.status {
            KeyStatus::CheckedOut { since, .. } => Some(*since),
            KeyStatus::Available => None,
        }
    }
}

/// A key as it is persisted in the `keys` blob.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "0190f5c2-8a7e-7cc3-9b4e-2f1d3c4b5a69",
///   "name": "Main Office",
///   "location": "Bldg A",
///   "isCheckedOut": true,
///   "checkedOutBy": "Alice",
///   "checkedOutAt": "2025-12-20T10:00:00.000Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredKey {
    pub id: String,
    pub name: String,
    pub location: String,
    pub is_checked_out: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_out_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl From<&Key> for StoredKey {
    fn from(key: &Key) -> Self {
        Self {
            id: key.id.clone(),
            name: key.name.clone(),
            location: key.location.clone(),
            is_checked_out: key.is_checked_out(),
            checked_out_by: key.holder().map(str::to_string),
            checked_out_at: key.checked_out_at(),
        }
    }
}

/// Reject stored records with blank labels or holder fields that disagree
/// with their status.
impl TryFrom<StoredKey> for Key {
    type Error = String;

    fn try_from(stored: StoredKey) -> Result<Self, Self::Error> {
        for (field, value) in [
            ("name", Some(&stored.name)),
            ("location", Some(&stored.location)),
            ("checkedOutBy", stored.checked_out_by.as_ref()),
        ] {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("key '{}' has a blank {}", stored.id, field));
            }
        }

        let status = match (
            stored.is_checked_out,
            stored.checked_out_by,
            stored.checked_out_at,
        ) {
            (false, None, None) => KeyStatus::Available,
            (true, Some(holder), Some(since)) => KeyStatus::CheckedOut { holder, since },
            (true, _, _) => {
                return Err(format!(
                    "key '{}' is checked out without both holder and checkout time",
                    stored.id
                ));
            }
            (false, _, _) => {
                return Err(format!(
                    "key '{}' is available but still carries holder fields",
                    stored.id
                ));
            }
        };

        Ok(Self {
            id: stored.id,
            name: stored.name,
            location: stored.location,
            status,
        })
    }
}

/// Request body for adding a key.
///
/// # Validation
///
/// - `name`: Required, non-empty after trimming
/// - `location`: Required, non-empty after trimming
#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    pub name: String,
    pub location: String,
}

/// Request body for checking a key out or in.
///
/// ```json
/// { "person_name": "Alice" }
/// ```
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub person_name: String,
}

/// Filter for the key listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Available,
    CheckedOut,
}

impl StatusFilter {
    pub fn matches(self, key: &Key) -> bool {
        match self {
            StatusFilter::Available => !key.is_checked_out(),
            StatusFilter::CheckedOut => key.is_checked_out(),
        }
    }
}

/// Query string for `GET /api/v1/keys`.
#[derive(Debug, Default, Deserialize)]
pub struct ListKeysQuery {
    pub status: Option<StatusFilter>,
}

/// Response body for key endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "0190f5c2-8a7e-7cc3-9b4e-2f1d3c4b5a69",
///   "name": "Main Office",
///   "location": "Bldg A",
///   "is_checked_out": false,
///   "checked_out_by": null,
///   "checked_out_at": null
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct KeyResponse {
    pub id: String,
    pub name: String,
    pub location: String,
    pub is_checked_out: bool,
    pub checked_out_by: Option<String>,
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl From<Key> for KeyResponse {
    fn from(key: Key) -> Self {
        let (checked_out_by, checked_out_at) = match key.status {
            KeyStatus::CheckedOut { holder, since } => (Some(holder), Some(since)),
            KeyStatus::Available => (None, None),
        };

        Self {
            is_checked_out: checked_out_by.is_some(),
            id: key.id,
            name: key.name,
            location: key.location,
            checked_out_by,
            checked_out_at,
        }
    }
}

/// Response body for check-out and check-in.
///
/// `log_recorded` is `false` when the key was updated but its log entry
/// could not be stored; `warning` then says why.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub key: KeyResponse,
    pub log_entry: LogEntryResponse,
    pub log_recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Inventory counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeySummary {
    pub total: usize,
    pub checked_out: usize,
    pub available: usize,
}

impl KeySummary {
    pub fn from_keys(keys: &[Key]) -> Self {
        let checked_out = keys.iter().filter(|k| k.is_checked_out()).count();
        Self {
            total: keys.len(),
            checked_out,
            available: keys.len() - checked_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(json: &str) -> StoredKey {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_reads_records_written_by_earlier_clients() {
        let key = Key::try_from(stored(
            r#"{"id":"1718000000000","name":"Shed","location":"Garden",
                "isCheckedOut":true,"checkedOutBy":"Alice",
                "checkedOutAt":"2024-06-10T08:30:00.000Z"}"#,
        ))
        .unwrap();

        assert_eq!(key.id, "1718000000000");
        assert_eq!(key.holder(), Some("Alice"));
        assert_eq!(
            key.checked_out_at().unwrap().to_rfc3339(),
            "2024-06-10T08:30:00+00:00"
        );
    }

    #[test]
    fn test_null_optionals_read_as_absent() {
        let key = Key::try_from(stored(
            r#"{"id":"k","name":"n","location":"l","isCheckedOut":false,
                "checkedOutBy":null,"checkedOutAt":null}"#,
        ))
        .unwrap();
        assert_eq!(key.status, KeyStatus::Available);
    }

    #[test]
    fn test_half_checked_out_record_rejected() {
        let result = Key::try_from(stored(
            r#"{"id":"k","name":"n","location":"l","isCheckedOut":true,"checkedOutBy":"Bob"}"#,
        ));
        assert!(result.is_err());

        let result = Key::try_from(stored(
            r#"{"id":"k","name":"n","location":"l","isCheckedOut":false,"checkedOutBy":"Bob"}"#,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_available_key_omits_holder_fields() {
        let key = Key::new("k".into(), "Main Office".into(), "Bldg A".into());
        let json = serde_json::to_value(StoredKey::from(&key)).unwrap();

        assert_eq!(json["isCheckedOut"], false);
        assert!(json.get("checkedOutBy").is_none());
        assert!(json.get("checkedOutAt").is_none());
    }

    #[test]
    fn test_summary_counts() {
        let mut out = Key::new("2".into(), "b".into(), "l".into());
        out.status = KeyStatus::CheckedOut {
            holder: "Alice".into(),
            since: Utc::now(),
        };
        let keys = vec![Key::new("1".into(), "a".into(), "l".into()), out];

        assert_eq!(
            KeySummary::from_keys(&keys),
            KeySummary {
                total: 2,
                checked_out: 1,
                available: 1
            }
        );
        assert!(StatusFilter::CheckedOut.matches(&keys[1]));
        assert!(!StatusFilter::CheckedOut.matches(&keys[0]));
    }
}
