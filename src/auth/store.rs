//! Persisted single-slot credential storage.
//!
//! The slot is one file holding the raw bearer token; absence of the file
//! means no session. Every read goes back to disk so all components observe
//! the same value regardless of which one mutated it last.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::auth::claims::token_expired;

/// Token slot file name inside the data directory
const TOKEN_FILE: &str = "token";

/// Process-wide slot holding at most one bearer token.
///
/// The mutex serializes slot transitions under the multi-threaded runtime so
/// redundant clears from racing triggers (sweep tick vs. 401 response) stay
/// idempotent.
pub struct TokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(TOKEN_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Read the persisted token fresh from disk.
    ///
    /// Unreadable slots are reported as absent; a credential is either
    /// entirely present or entirely absent, never partial.
    pub fn get(&self) -> Option<String> {
        let _slot = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    None
                } else {
                    Some(raw.to_string())
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, "failed to read token slot, treating session as absent");
                None
            }
        }
    }

    /// Commit a fresh token to the slot.
    ///
    /// An already-expired or undecodable token is never committed: the slot
    /// is cleared instead and the call fails with
    /// [`ApiError::SessionExpired`], so a login against a skew-broken issuer
    /// surfaces as a failure rather than a silently absent session.
    pub fn set(&self, token: &str) -> Result<(), ApiError> {
        if token_expired(token, Utc::now()) {
            warn!("rejected attempt to store an expired token");
            self.clear();
            return Err(ApiError::SessionExpired);
        }

        let _slot = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        debug!("token stored");
        Ok(())
    }

    /// Remove the token from the slot. Clearing an absent slot is a no-op.
    pub fn clear(&self) {
        let _slot = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("token cleared"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "failed to remove token slot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::tests::token_expiring_in;

    fn store() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn empty_slot_reads_absent() {
        let (_dir, store) = store();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let (_dir, store) = store();
        let token = token_expiring_in("alice", Utc::now(), 3600);
        store.set(&token).unwrap();
        assert_eq!(store.get().as_deref(), Some(token.as_str()));
    }

    #[test]
    fn set_rejects_expired_token_and_clears() {
        let (_dir, store) = store();
        store.set(&token_expiring_in("alice", Utc::now(), 3600)).unwrap();

        let stale = token_expiring_in("alice", Utc::now(), -60);
        let err = store.set(&stale).unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn set_rejects_undecodable_token() {
        let (_dir, store) = store();
        assert!(matches!(
            store.set("not-a-jwt").unwrap_err(),
            ApiError::SessionExpired
        ));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = store();
        store.set(&token_expiring_in("alice", Utc::now(), 3600)).unwrap();
        store.clear();
        store.clear();
        assert_eq!(store.get(), None);
    }
}
