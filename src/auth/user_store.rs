//! Credential store: identity lookup and password verification.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use dashmap::DashMap;

use super::error::{AuthError, AuthResult};
use super::models::Identity;

/// Read-only identity lookup and secret verification.
///
/// Absence of a match is a normal result, not an error; callers must treat
/// not-found and verify-failure the same way. The trait seam lets the same
/// orchestrator run against this in-memory store or a durable backend.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Identity>>;

    async fn find_by_id(&self, id: &str) -> AuthResult<Option<Identity>>;

    /// Salted, slow, timing-safe comparison of a submitted password
    /// against the stored hash.
    async fn verify_password(&self, user: &Identity, password: &str) -> AuthResult<bool>;
}

/// In-memory user store keyed by username, seeded at startup.
pub struct InMemoryUserStore {
    users: DashMap<String, Identity>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Store with the fixed demo accounts provisioned:
    /// `teacher1` (Teacher) and `student1` (Student), password `P@ssw0rd!`.
    pub fn with_demo_users() -> AuthResult<Self> {
        let store = Self::new();
        store.provision("T001", "teacher1", "P@ssw0rd!", &["Teacher"])?;
        store.provision("S001", "student1", "P@ssw0rd!", &["Student"])?;
        Ok(store)
    }

    /// Hash a plaintext password and register the identity.
    pub fn provision(
        &self,
        id: &str,
        username: &str,
        password: &str,
        roles: &[&str],
    ) -> AuthResult<()> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        let identity = Identity {
            id: id.to_string(),
            username: username.to_string(),
            password_hash,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        };
        self.users.insert(identity.username.clone(), identity);
        Ok(())
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> AuthResult<Option<Identity>> {
        Ok(self.users.get(username).map(|u| u.clone()))
    }

    async fn find_by_id(&self, id: &str) -> AuthResult<Option<Identity>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.clone()))
    }

    async fn verify_password(&self, user: &Identity, password: &str) -> AuthResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| AuthError::internal(format!("Stored hash is malformed: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
