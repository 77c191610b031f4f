//! Checkout coordinator - the only writer of the key table and the log.
//!
//! Every mutation runs as one read-validate-write-log sequence under a single
//! process-wide lock:
//!
//! 1. Validate input (nothing is read yet)
//! 2. Read the key table and check existence and status
//! 3. Write the new key table
//! 4. Append the matching log entry (transitions only)
//!
//! # Consistency Guarantees
//!
//! The key table is the source of truth. The table is always committed before
//! the log entry is attempted, so the log never records a transition that did
//! not happen. The reverse gap (a committed transition whose log append
//! failed) is reported through [`LogWrite::Missing`] instead of an error.

use crate::{
    error::AppError,
    models::{
        key::{Key, KeyStatus},
        log_entry::{LogAction, LogEntry},
    },
    services::{activity_log::ActivityLog, key_store::KeyRecordStore},
};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

/// Whether the log entry for a committed transition made it to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogWrite {
    Recorded(LogEntry),
    /// The key table was updated but appending `entry` failed.
    Missing { entry: LogEntry, reason: String },
}

impl LogWrite {
    pub fn is_recorded(&self) -> bool {
        matches!(self, LogWrite::Recorded(_))
    }

    pub fn entry(&self) -> &LogEntry {
        match self {
            LogWrite::Recorded(entry) | LogWrite::Missing { entry, .. } => entry,
        }
    }
}

/// Result of a successful check-out or check-in.
#[derive(Debug, Clone)]
pub struct Transition {
    /// The key as committed
    pub key: Key,
    pub log: LogWrite,
}

/// Serializes all writes to the key table and the log.
pub struct CheckoutCoordinator {
    keys: KeyRecordStore,
    logs: ActivityLog,
    write_lock: Mutex<()>,
}

impl CheckoutCoordinator {
    pub fn new(keys: KeyRecordStore, logs: ActivityLog) -> Self {
        Self {
            keys,
            logs,
            write_lock: Mutex::new(()),
        }
    }

    /// Key table for reads; not serialized with writers.
    pub fn keys(&self) -> &KeyRecordStore {
        &self.keys
    }

    /// Checkout log for reads; not serialized with writers.
    pub fn logs(&self) -> &ActivityLog {
        &self.logs
    }

    /// Add a new `Available` key.
    ///
    /// Name and location are stored trimmed.
    ///
    /// # Errors
    ///
    /// - `Validation`: name or location is blank
    /// - `Storage`: key table could not be read or written
    pub async fn add_key(&self, name: &str, location: &str) -> Result<Key, AppError> {
        let name = required("Key name", name)?;
        let location = required("Key location", location)?;

        let _guard = self.write_lock.lock().await;
        let mut keys = self.keys.list().await?;

        let mut id = new_id();
        while keys.iter().any(|k| k.id == id) {
            id = new_id();
        }

        let key = Key::new(id, name, location);
        keys.push(key.clone());
        self.keys.replace_all(&keys).await?;

        info!(key_id = %key.id, name = %key.name, "Key added");
        Ok(key)
    }

    /// Remove an `Available` key. Its log entries are kept.
    ///
    /// # Errors
    ///
    /// - `KeyNotFound`: no key with this id
    /// - `InvalidState`: key is checked out and must be checked in first
    /// - `Storage`: key table could not be read or written
    pub async fn remove_key(&self, id: &str) -> Result<Key, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut keys = self.keys.list().await?;

        let index = keys
            .iter()
            .position(|k| k.id == id)
            .ok_or(AppError::KeyNotFound)?;

        if let Some(holder) = keys[index].holder() {
            return Err(AppError::InvalidState(format!(
                "Key '{}' is checked out to {} and must be checked in before removal",
                keys[index].name, holder
            )));
        }

        let removed = keys.remove(index);
        self.keys.replace_all(&keys).await?;

        info!(key_id = %removed.id, name = %removed.name, "Key removed");
        Ok(removed)
    }

    /// Check an `Available` key out to `person`.
    ///
    /// # Errors
    ///
    /// - `Validation`: person is blank
    /// - `KeyNotFound`: no key with this id
    /// - `InvalidState`: key is already checked out
    /// - `Storage`: key table could not be read or written (no log entry is appended)
    pub async fn check_out(&self, id: &str, person: &str) -> Result<Transition, AppError> {
        let person = required("Person name", person)?;

        let _guard = self.write_lock.lock().await;
        let mut keys = self.keys.list().await?;

        let key = keys
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or(AppError::KeyNotFound)?;

        if let Some(holder) = key.holder() {
            return Err(AppError::InvalidState(format!(
                "Key '{}' is already checked out to {}",
                key.name, holder
            )));
        }

        let now = Utc::now();
        key.status = KeyStatus::CheckedOut {
            holder: person.clone(),
            since: now,
        };
        let key = key.clone();

        self.keys.replace_all(&keys).await?;
        info!(key_id = %key.id, name = %key.name, holder = %person, "Key checked out");

        let log = self.record(&key, LogAction::CheckOut, person, now).await;
        Ok(Transition { key, log })
    }

    /// Check a checked-out key back in.
    ///
    /// `person` is whoever returns the key and need not be the holder.
    ///
    /// # Errors
    ///
    /// - `Validation`: person is blank
    /// - `KeyNotFound`: no key with this id
    /// - `InvalidState`: key is not checked out
    /// - `Storage`: key table could not be read or written (no log entry is appended)
    pub async fn check_in(&self, id: &str, person: &str) -> Result<Transition, AppError> {
        let person = required("Person name", person)?;

        let _guard = self.write_lock.lock().await;
        let mut keys = self.keys.list().await?;

        let key = keys
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or(AppError::KeyNotFound)?;

        let KeyStatus::CheckedOut { holder, .. } =
            std::mem::replace(&mut key.status, KeyStatus::Available)
        else {
            return Err(AppError::InvalidState(format!(
                "Key '{}' is not checked out",
                key.name
            )));
        };
        let key = key.clone();

        self.keys.replace_all(&keys).await?;
        info!(
            key_id = %key.id,
            name = %key.name,
            previous_holder = %holder,
            returned_by = %person,
            "Key checked in"
        );

        let log = self
            .record(&key, LogAction::CheckIn, person, Utc::now())
            .await;
        Ok(Transition { key, log })
    }

    /// Append the log entry for a transition that is already committed.
    async fn record(
        &self,
        key: &Key,
        action: LogAction,
        person: String,
        timestamp: DateTime<Utc>,
    ) -> LogWrite {
        let entry = LogEntry {
            id: new_id(),
            key_name: key.name.clone(),
            action,
            person_name: person,
            timestamp,
        };

        match self.logs.append(&entry).await {
            Ok(()) => LogWrite::Recorded(entry),
            Err(e) => {
                error!(
                    key_id = %key.id,
                    log_id = %entry.id,
                    action = ?action,
                    error = %e,
                    "Transition committed but log entry was not written"
                );
                LogWrite::Missing {
                    entry,
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Time-ordered unique identifier.
fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Trimmed `value`, or a validation error naming `field` if it is blank.
fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}
