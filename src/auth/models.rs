//! Domain types for the session authentication subsystem.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A provisioned user account.
///
/// Immutable at runtime: accounts are created from seed data at startup
/// and never mutated by any auth flow. The password is held only as an
/// argon2 hash string.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// One long-lived refresh token registration.
///
/// The opaque token string is the primary key. Records are tombstoned by
/// flipping `revoked`, never deleted, so a replayed token is observable as
/// a revoked record rather than a missing one.
#[derive(Debug, Clone)]
pub struct RefreshRecord {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshRecord {
    /// Build a fresh record with a newly generated opaque token.
    ///
    /// The record is not stored yet; `RefreshTokenStore::create` or
    /// `rotate` installs it.
    pub fn issue(user_id: &str, lifetime: Duration) -> Self {
        Self {
            token: generate_token(),
            user_id: user_id.to_string(),
            expires_at: Utc::now() + lifetime,
            revoked: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Active = acceptable for a refresh exchange.
    pub fn is_active(&self) -> bool {
        !self.revoked && !self.is_expired()
    }
}

/// Generate an opaque refresh token: 32 bytes from the OS CSPRNG,
/// base64-encoded (44 characters).
fn generate_token() -> String {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use rand::RngCore;

    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

/// JWT claims carried by an access token.
///
/// Self-contained: nothing here is backed by server-side state. `iss` and
/// `aud` are validated on every verification along with the signature and
/// `exp`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the identity id
    pub sub: String,
    /// Display/login name
    pub uname: String,
    /// Role labels
    pub roles: Vec<String>,
    /// Issued at (UTC timestamp)
    pub iat: usize,
    /// Expiration time (UTC timestamp)
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

/// The verified caller of a protected route.
///
/// Built by the bearer middleware from validated claims and injected into
/// request extensions. Handlers and the orchestrator receive this value
/// explicitly instead of reading ambient request context.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            username: claims.uname.clone(),
            roles: claims.roles.clone(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_length_and_charset() {
        let token = generate_token();
        // 32 bytes -> 44 chars of standard base64 (with padding)
        assert_eq!(token.len(), 44);
    }

    #[test]
    fn test_generated_tokens_unique() {
        let tokens: Vec<String> = (0..100)
            .map(|_| RefreshRecord::issue("U1", Duration::days(1)).token)
            .collect();
        let mut unique = tokens.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(tokens.len(), unique.len());
    }

    #[test]
    fn test_record_state_transitions() {
        let mut rec = RefreshRecord::issue("U1", Duration::days(1));
        assert!(rec.is_active());

        rec.revoked = true;
        assert!(!rec.is_active());

        let expired = RefreshRecord::issue("U1", Duration::seconds(-1));
        assert!(expired.is_expired());
        assert!(!expired.is_active());
    }

    #[test]
    fn test_has_role() {
        let user = AuthenticatedUser {
            user_id: "T001".to_string(),
            username: "teacher1".to_string(),
            roles: vec!["Teacher".to_string()],
        };
        assert!(user.has_role("Teacher"));
        assert!(!user.has_role("Student"));
    }
}
