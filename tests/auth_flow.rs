//! End-to-end tests of the login / refresh / logout token lifecycle,
//! driven through the orchestrator against the in-memory stores.

use std::sync::Arc;

use learnhub::auth::error::AuthErrorCode;
use learnhub::auth::models::AuthenticatedUser;
use learnhub::auth::refresh_store::{InMemoryRefreshTokenStore, RefreshTokenStore};
use learnhub::auth::service::AuthService;
use learnhub::auth::user_store::InMemoryUserStore;
use learnhub::config::JwtConfig;

const ACCESS_TOKEN_MINUTES: i64 = 60;

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        issuer: "learnhub-api".to_string(),
        audience: "learnhub-clients".to_string(),
        access_token_minutes: ACCESS_TOKEN_MINUTES,
        refresh_token_days: 14,
    }
}

/// Service plus a handle on the refresh store for expiry manipulation.
fn build_service() -> (AuthService, Arc<InMemoryRefreshTokenStore>) {
    let users = Arc::new(InMemoryUserStore::with_demo_users().unwrap());
    let refresh = Arc::new(InMemoryRefreshTokenStore::new());
    let service = AuthService::new(users, refresh.clone(), &jwt_config());
    (service, refresh)
}

fn teacher_principal() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: "T001".to_string(),
        username: "teacher1".to_string(),
        roles: vec!["Teacher".to_string()],
    }
}

#[tokio::test]
async fn login_returns_decodable_token_with_configured_lifetime() {
    let (service, _) = build_service();

    let tokens = service.login("teacher1", "P@ssw0rd!").await.unwrap();

    assert!(!tokens.access_token.is_empty());
    assert_eq!(
        tokens.expires_in,
        ACCESS_TOKEN_MINUTES * 60,
        "expiresIn must be the configured minutes in seconds"
    );
    // 32 bytes of entropy, base64-encoded
    assert!(
        tokens.refresh_token.len() >= 44,
        "refresh token too short: {}",
        tokens.refresh_token.len()
    );

    let claims = service.verify_access_token(&tokens.access_token).unwrap();
    assert_eq!(claims.sub, "T001");
    assert_eq!(claims.uname, "teacher1");
    assert_eq!(claims.roles, vec!["Teacher".to_string()]);
    assert_eq!(
        claims.exp - claims.iat,
        (ACCESS_TOKEN_MINUTES * 60) as usize,
        "expiry must be issue-time plus the configured lifetime"
    );
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() {
    let (service, _) = build_service();

    let unknown_user = service.login("no-such-user", "P@ssw0rd!").await.unwrap_err();
    let wrong_password = service.login("teacher1", "incorrect").await.unwrap_err();

    assert_eq!(unknown_user.code, AuthErrorCode::AuthFailed);
    assert_eq!(unknown_user.code, wrong_password.code);
    assert_eq!(unknown_user.message, wrong_password.message);
}

#[tokio::test]
async fn refresh_token_works_exactly_once() {
    let (service, _) = build_service();
    let login = service.login("teacher1", "P@ssw0rd!").await.unwrap();

    // First exchange succeeds and returns a different token
    let refreshed = service.refresh(&login.refresh_token).await.unwrap();
    assert_ne!(refreshed.refresh_token, login.refresh_token);
    assert!(!refreshed.access_token.is_empty());

    // Replaying the rotated token is unauthenticated
    let replay = service.refresh(&login.refresh_token).await.unwrap_err();
    assert_eq!(replay.code, AuthErrorCode::AuthFailed);

    // The chain continues from the new token
    service.refresh(&refreshed.refresh_token).await.unwrap();
}

#[tokio::test]
async fn empty_refresh_token_is_a_bad_request_not_unauthorized() {
    let (service, _) = build_service();

    let err = service.refresh("").await.unwrap_err();
    assert_eq!(err.code, AuthErrorCode::MissingRefreshToken);

    let err = service.refresh("   ").await.unwrap_err();
    assert_eq!(err.code, AuthErrorCode::MissingRefreshToken);
}

#[tokio::test]
async fn expired_refresh_token_is_rejected_even_if_unused() {
    let (service, refresh_store) = build_service();

    let record = refresh_store
        .create("T001", chrono::Duration::seconds(-1))
        .await
        .unwrap();

    let err = service.refresh(&record.token).await.unwrap_err();
    assert_eq!(err.code, AuthErrorCode::AuthFailed);
}

#[tokio::test]
async fn refresh_rejects_token_of_vanished_owner() {
    let (service, refresh_store) = build_service();

    // A record whose owner id matches no provisioned identity
    let record = refresh_store
        .create("DELETED-USER", chrono::Duration::days(14))
        .await
        .unwrap();

    let err = service.refresh(&record.token).await.unwrap_err();
    assert_eq!(err.code, AuthErrorCode::AuthFailed);
}

#[tokio::test]
async fn logout_without_token_revokes_every_session() {
    let (service, _) = build_service();

    let session_a = service.login("teacher1", "P@ssw0rd!").await.unwrap();
    let session_b = service.login("teacher1", "P@ssw0rd!").await.unwrap();

    service.logout(&teacher_principal(), None).await.unwrap();

    for token in [&session_a.refresh_token, &session_b.refresh_token] {
        let err = service.refresh(token).await.unwrap_err();
        assert_eq!(err.code, AuthErrorCode::AuthFailed);
    }
}

#[tokio::test]
async fn logout_with_token_spares_sibling_sessions() {
    let (service, _) = build_service();

    let session_a = service.login("teacher1", "P@ssw0rd!").await.unwrap();
    let session_b = service.login("teacher1", "P@ssw0rd!").await.unwrap();

    service
        .logout(&teacher_principal(), Some(&session_a.refresh_token))
        .await
        .unwrap();

    let err = service.refresh(&session_a.refresh_token).await.unwrap_err();
    assert_eq!(err.code, AuthErrorCode::AuthFailed);

    // The other device's session still refreshes
    service.refresh(&session_b.refresh_token).await.unwrap();
}

#[tokio::test]
async fn logout_with_unknown_token_is_a_silent_noop() {
    let (service, _) = build_service();
    let login = service.login("teacher1", "P@ssw0rd!").await.unwrap();

    service
        .logout(&teacher_principal(), Some("never-issued-token"))
        .await
        .unwrap();

    // The real session is untouched
    service.refresh(&login.refresh_token).await.unwrap();
}

#[tokio::test]
async fn logout_only_touches_the_callers_tokens() {
    let (service, _) = build_service();

    let teacher = service.login("teacher1", "P@ssw0rd!").await.unwrap();
    let student = service.login("student1", "P@ssw0rd!").await.unwrap();

    service.logout(&teacher_principal(), None).await.unwrap();

    assert!(service.refresh(&teacher.refresh_token).await.is_err());
    service.refresh(&student.refresh_token).await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_refreshes_of_one_token_yield_one_winner() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let login = service.login("teacher1", "P@ssw0rd!").await.unwrap();

    let mut handles = vec![];
    for _ in 0..16 {
        let service = Arc::clone(&service);
        let token = login.refresh_token.clone();
        handles.push(tokio::spawn(
            async move { service.refresh(&token).await.is_ok() },
        ));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(
        successes, 1,
        "a refresh token must never be exchangeable more than once"
    );
}
