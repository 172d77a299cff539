//! Access token issuance and verification.
//!
//! Tokens are stateless HS256 JWTs: no server-side record backs them.
//! Verification checks signature, issuer, audience and expiry with a
//! 30 second leeway for clock drift between issuer and verifier.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::error::{AuthError, AuthResult};
use super::models::{Claims, Identity};
use crate::config::JwtConfig;

const CLOCK_SKEW_LEEWAY_SECS: u64 = 30;

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    access_token_minutes: i64,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_minutes: config.access_token_minutes,
        }
    }

    /// Issue a signed access token for `user`.
    ///
    /// Returns the encoded token and its lifetime in seconds
    /// (`access_token_minutes * 60`, the `expiresIn` the API reports).
    pub fn issue(&self, user: &Identity) -> AuthResult<(String, i64)> {
        let now = Utc::now();
        let expires_in = self.access_token_minutes * 60;
        let expiry = now + Duration::minutes(self.access_token_minutes);

        let claims = Claims {
            sub: user.id.clone(),
            uname: user.username.clone(),
            roles: user.roles.clone(),
            iat: now.timestamp() as usize,
            exp: expiry.timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("Failed to sign access token: {}", e)))?;

        Ok((token, expires_in))
    }

    /// Verify signature, issuer, audience and expiry; returns the decoded
    /// claims. Any failure collapses into the generic unauthenticated
    /// outcome.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::unauthenticated())?;
        Ok(token_data.claims)
    }
}
