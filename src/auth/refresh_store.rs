//! Refresh token registry with single-use rotation.
//!
//! Records are tombstoned (revoked flag), never deleted: a replayed token
//! must be observable as revoked, not merely absent. Rotation is a
//! compare-and-swap on the old record's revoked flag under its DashMap
//! shard write guard, so two racing exchanges of the same token resolve
//! to exactly one winner.

use async_trait::async_trait;
use chrono::Duration;
use dashmap::DashMap;

use super::error::AuthResult;
use super::models::RefreshRecord;

/// Stateful registry of long-lived opaque refresh tokens.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Generate and register a new active record for `user_id`.
    async fn create(&self, user_id: &str, lifetime: Duration) -> AuthResult<RefreshRecord>;

    /// Pure lookup; returns revoked/expired records too. Callers check
    /// `is_active()` before accepting one.
    async fn find(&self, token: &str) -> AuthResult<Option<RefreshRecord>>;

    /// Idempotently mark a record revoked. Unknown token is a no-op.
    async fn revoke(&self, token: &str) -> AuthResult<()>;

    /// Mark every record owned by `user_id` revoked, expired or not.
    /// Returns the number of records newly revoked.
    async fn revoke_all_for_user(&self, user_id: &str) -> AuthResult<u64>;

    /// Atomically revoke `old_token` and install `new_record`.
    ///
    /// Returns `true` only for the caller that actually flipped the old
    /// record from active to revoked; a racing duplicate gets `false` and
    /// `new_record` is discarded. Unknown or already-revoked old tokens
    /// also return `false` without error.
    async fn rotate(&self, old_token: &str, new_record: RefreshRecord) -> AuthResult<bool>;
}

/// In-memory store keyed by the opaque token string.
pub struct InMemoryRefreshTokenStore {
    tokens: DashMap<String, RefreshRecord>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
        }
    }

    /// Number of records, tombstones included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for InMemoryRefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn create(&self, user_id: &str, lifetime: Duration) -> AuthResult<RefreshRecord> {
        let record = RefreshRecord::issue(user_id, lifetime);
        self.tokens.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn find(&self, token: &str) -> AuthResult<Option<RefreshRecord>> {
        Ok(self.tokens.get(token).map(|r| r.clone()))
    }

    async fn revoke(&self, token: &str) -> AuthResult<()> {
        if let Some(mut record) = self.tokens.get_mut(token) {
            record.revoked = true;
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> AuthResult<u64> {
        let mut revoked = 0u64;
        for mut entry in self.tokens.iter_mut() {
            if entry.user_id == user_id && !entry.revoked {
                entry.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn rotate(&self, old_token: &str, new_record: RefreshRecord) -> AuthResult<bool> {
        // CAS on the revoked flag: only one caller can observe
        // revoked == false and flip it. The guard must drop before the
        // insert below touches the map again.
        let won = match self.tokens.get_mut(old_token) {
            Some(mut old) => {
                if old.revoked {
                    false
                } else {
                    old.revoked = true;
                    true
                }
            }
            None => false,
        };

        if won {
            self.tokens.insert(new_record.token.clone(), new_record);
        }
        Ok(won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_then_find() {
        let store = InMemoryRefreshTokenStore::new();
        let rec = store.create("T001", Duration::days(14)).await.unwrap();

        let found = store.find(&rec.token).await.unwrap().unwrap();
        assert_eq!(found.user_id, "T001");
        assert!(found.is_active());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent_and_tombstones() {
        let store = InMemoryRefreshTokenStore::new();
        let rec = store.create("T001", Duration::days(14)).await.unwrap();

        store.revoke(&rec.token).await.unwrap();
        store.revoke(&rec.token).await.unwrap();
        store.revoke("unknown-token").await.unwrap(); // no-op

        // Tombstone still present for replay detection
        let found = store.find(&rec.token).await.unwrap().unwrap();
        assert!(found.revoked);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_revoke_all_for_user_spares_others() {
        let store = InMemoryRefreshTokenStore::new();
        let t1 = store.create("T001", Duration::days(14)).await.unwrap();
        let t2 = store.create("T001", Duration::days(14)).await.unwrap();
        let s1 = store.create("S001", Duration::days(14)).await.unwrap();

        let n = store.revoke_all_for_user("T001").await.unwrap();
        assert_eq!(n, 2);

        assert!(store.find(&t1.token).await.unwrap().unwrap().revoked);
        assert!(store.find(&t2.token).await.unwrap().unwrap().revoked);
        assert!(store.find(&s1.token).await.unwrap().unwrap().is_active());
    }

    #[tokio::test]
    async fn test_rotate_revokes_old_and_installs_new() {
        let store = InMemoryRefreshTokenStore::new();
        let old = store.create("T001", Duration::days(14)).await.unwrap();
        let new = RefreshRecord::issue("T001", Duration::days(14));

        assert!(store.rotate(&old.token, new.clone()).await.unwrap());

        assert!(store.find(&old.token).await.unwrap().unwrap().revoked);
        assert!(store.find(&new.token).await.unwrap().unwrap().is_active());
    }

    #[tokio::test]
    async fn test_rotate_loses_on_revoked_or_unknown() {
        let store = InMemoryRefreshTokenStore::new();
        let old = store.create("T001", Duration::days(14)).await.unwrap();
        store.revoke(&old.token).await.unwrap();

        let new = RefreshRecord::issue("T001", Duration::days(14));
        assert!(!store.rotate(&old.token, new.clone()).await.unwrap());
        // Loser's record must not be installed
        assert!(store.find(&new.token).await.unwrap().is_none());

        let other = RefreshRecord::issue("T001", Duration::days(14));
        assert!(!store.rotate("never-issued", other).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_rotation_single_winner() {
        let store = Arc::new(InMemoryRefreshTokenStore::new());
        let old = store.create("T001", Duration::days(14)).await.unwrap();

        let mut handles = vec![];
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let old_token = old.token.clone();
            handles.push(tokio::spawn(async move {
                let new = RefreshRecord::issue("T001", Duration::days(14));
                store.rotate(&old_token, new).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
