//! Selective durable snapshots.
//!
//! Only the cart, the seat selection and the WhatsApp link survive a
//! restart. Session, queue membership, notices and checkout progress are
//! deliberately session-scoped and never written.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::state::StorefrontState;
use crate::types::{CartItem, SeatOption};

/// The durable subset of [`StorefrontState`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    /// Cart lines
    #[serde(default)]
    pub cart: Vec<CartItem>,
    /// The single held seat, if any
    #[serde(default)]
    pub seat_selection: Option<SeatOption>,
    /// Whether the user linked WhatsApp notifications
    #[serde(default)]
    pub whatsapp_connected: bool,
}

impl StoredSnapshot {
    /// Extract the durable subset from live state
    #[must_use]
    pub fn capture(state: &StorefrontState) -> Self {
        Self {
            cart: state.cart.clone(),
            seat_selection: state.seat_selection.clone(),
            whatsapp_connected: state.whatsapp_connected,
        }
    }

    /// Overlay this snapshot onto a state, leaving session fields alone
    pub fn apply(self, state: &mut StorefrontState) {
        state.cart = self.cart;
        state.seat_selection = self.seat_selection;
        state.whatsapp_connected = self.whatsapp_connected;
    }
}

/// Why a snapshot read or write failed
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Filesystem problem
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    /// The stored payload is not valid snapshot JSON
    #[error("snapshot encoding: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Where snapshots are kept
pub trait SnapshotStore: Send + Sync {
    /// Read the last snapshot, `None` when none was ever written
    ///
    /// # Errors
    /// Returns an error when the backing store is unreadable or the
    /// payload does not parse.
    fn load(&self) -> Result<Option<StoredSnapshot>, SnapshotError>;

    /// Replace the stored snapshot
    ///
    /// # Errors
    /// Returns an error when the snapshot cannot be serialized or written.
    fn save(&self, snapshot: &StoredSnapshot) -> Result<(), SnapshotError>;
}

/// Snapshots as a single JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileSnapshots {
    path: PathBuf,
}

impl JsonFileSnapshots {
    /// Store snapshots at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFileSnapshots {
    fn load(&self) -> Result<Option<StoredSnapshot>, SnapshotError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, snapshot: &StoredSnapshot) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string(snapshot)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory snapshot store for tests
///
/// Round-trips through the JSON encoding so serde-level behavior (unknown
/// fields, missing fields, corruption) matches the file-backed store.
#[derive(Debug, Default)]
pub struct MemorySnapshots {
    record: Mutex<Option<String>>,
}

impl MemorySnapshots {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw payload, valid or not
    #[must_use]
    pub fn with_raw(raw: &str) -> Self {
        Self {
            record: Mutex::new(Some(raw.to_owned())),
        }
    }

    /// The raw stored payload, if any
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SnapshotStore for MemorySnapshots {
    fn load(&self) -> Result<Option<StoredSnapshot>, SnapshotError> {
        let guard = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &StoredSnapshot) -> Result<(), SnapshotError> {
        let raw = serde_json::to_string(snapshot)?;
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code fails loudly
mod tests {
    use super::*;
    use crate::types::{CartKind, Money};

    fn sample_state() -> StorefrontState {
        let mut state = StorefrontState::default();
        state.cart.push(CartItem {
            kind: CartKind::Merch,
            ref_id: Some("1".into()),
            name: "Polera".into(),
            qty: 2,
            unit_price: Money::from_cents(2_500_000),
        });
        state.whatsapp_connected = true;
        state.turn_notice_sent = true;
        state
    }

    #[test]
    fn capture_takes_only_the_durable_subset() {
        let snapshot = StoredSnapshot::capture(&sample_state());
        assert_eq!(snapshot.cart.len(), 1);
        assert!(snapshot.whatsapp_connected);

        let mut restored = StorefrontState::default();
        snapshot.apply(&mut restored);
        assert_eq!(restored.cart.len(), 1);
        assert!(restored.whatsapp_connected);
        assert!(!restored.turn_notice_sent, "latch is session-scoped");
        assert!(restored.user.is_none());
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemorySnapshots::new();
        assert!(store.load().unwrap().is_none());

        let snapshot = StoredSnapshot::capture(&sample_state());
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let store = MemorySnapshots::with_raw(
            r#"{"cart":[],"seat_selection":null,"whatsapp_connected":true,"legacy_field":42}"#,
        );
        let snapshot = store.load().unwrap().unwrap();
        assert!(snapshot.whatsapp_connected);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let store = MemorySnapshots::with_raw("{}");
        let snapshot = store.load().unwrap().unwrap();
        assert!(snapshot.cart.is_empty());
        assert!(snapshot.seat_selection.is_none());
        assert!(!snapshot.whatsapp_connected);
    }

    #[test]
    fn corrupt_payloads_error() {
        let store = MemorySnapshots::with_raw("not json at all");
        assert!(matches!(store.load(), Err(SnapshotError::Serde(_))));
    }

    #[test]
    fn file_store_reports_missing_as_none() {
        let store = JsonFileSnapshots::new("/nonexistent-dir-fila/never-written.json");
        assert!(store.load().unwrap().is_none());
    }
}
