//! The persistence boundary for edited profiles.
//!
//! An administrative flow saves a target principal with one PATCH-like
//! call. The core does not retry or queue saves; the caller decides what
//! to do with each outcome. `NotFound` means the directory entry is stale
//! and should be dropped from the admin's listing.

use async_trait::async_trait;

use crate::principal::Principal;

/// Failure modes of a profile save.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The target principal no longer exists upstream.
    #[error("principal not found")]
    NotFound,

    /// The upstream rejected the payload.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transport-level failure.
    #[error("save failed: {0}")]
    Transport(#[from] anyhow::Error),
}

/// One-call-per-principal save operation, implemented by the external
/// profile service client.
#[async_trait]
pub trait ProfileStore {
    /// Persist the principal; returns the saved principal on success.
    async fn save_profile(&self, principal: &Principal) -> Result<Principal, SaveError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use classport_authz::catalog::PORTAL_CATALOG;
    use crate::principal::SessionUser;
    use std::sync::Mutex;

    /// In-memory store used by admin-flow tests.
    struct FakeStore {
        saved: Mutex<Vec<Principal>>,
        fail_with: Option<fn() -> SaveError>,
    }

    #[async_trait]
    impl ProfileStore for FakeStore {
        async fn save_profile(&self, principal: &Principal) -> Result<Principal, SaveError> {
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            self.saved.lock().unwrap().push(principal.clone());
            Ok(principal.clone())
        }
    }

    fn principal() -> Principal {
        let session: SessionUser = serde_json::from_str(
            r#"{"id": "00000000-0000-0000-0000-000000000009",
                "username": "asha", "user_type": "staff"}"#,
        )
        .unwrap();
        Principal::from_session(session, PORTAL_CATALOG)
    }

    #[tokio::test]
    async fn test_save_returns_saved_principal() {
        let store = FakeStore {
            saved: Mutex::new(Vec::new()),
            fail_with: None,
        };

        let saved = store.save_profile(&principal()).await.unwrap();
        assert_eq!(saved.username, "asha");
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_reported_once() {
        let store = FakeStore {
            saved: Mutex::new(Vec::new()),
            fail_with: Some(|| SaveError::NotFound),
        };

        let err = store.save_profile(&principal()).await.unwrap_err();
        assert!(matches!(err, SaveError::NotFound));
        // No retry happened.
        assert!(store.saved.lock().unwrap().is_empty());
    }
}
