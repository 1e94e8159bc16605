//! Integration tests for the auth flow.
//!
//! These tests use a mock token endpoint to verify the exchange and refresh
//! behavior without a real provider.

use mixlink_auth::{AuthFlow, CallbackParams, PkceMode};
use mixlink_core::keys::{KEY_ACCESS_TOKEN, KEY_CODE_VERIFIER, KEY_REFRESH_TOKEN};
use mixlink_core::{ClientConfig, KeyValueStore, MemoryStore};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new("client123", "https://mixlink.example")
        .with_endpoints(server.uri(), server.uri())
}

fn token_body(access: &str, refresh: Option<&str>) -> serde_json::Value {
    match refresh {
        Some(refresh) => serde_json::json!({
            "access_token": access,
            "refresh_token": refresh,
            "token_type": "Bearer",
            "expires_in": 3600,
        }),
        None => serde_json::json!({
            "access_token": access,
            "token_type": "Bearer",
            "expires_in": 3600,
        }),
    }
}

// =============================================================================
// begin_login
// =============================================================================

mod begin_login {
    use super::*;

    #[tokio::test]
    async fn authorize_url_carries_pkce_params() {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStore::new());
        let flow = AuthFlow::new(test_config(&server), storage.clone()).unwrap();

        let url = flow.begin_login().await.unwrap();

        let pairs: std::collections::HashMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["client_id"], "client123");
        assert_eq!(pairs["redirect_uri"], "https://mixlink.example/callback");
        assert!(pairs["scope"].contains("playlist-modify-public"));
        assert_eq!(pairs["code_challenge_method"], "S256");
        assert_eq!(pairs["code_challenge"].len(), 43);

        // Verifier stored, challenge derived from it
        let verifier = storage.get(KEY_CODE_VERIFIER).await.unwrap().unwrap();
        assert_eq!(verifier.len(), 128);
        assert_eq!(
            pairs["code_challenge"],
            mixlink_auth::code_challenge(&verifier)
        );
    }

    #[tokio::test]
    async fn each_attempt_gets_a_fresh_verifier() {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStore::new());
        let flow = AuthFlow::new(test_config(&server), storage.clone()).unwrap();

        flow.begin_login().await.unwrap();
        let first = storage.get(KEY_CODE_VERIFIER).await.unwrap().unwrap();
        flow.begin_login().await.unwrap();
        let second = storage.get(KEY_CODE_VERIFIER).await.unwrap().unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn disabled_mode_omits_challenge_and_stores_no_verifier() {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStore::new());
        let flow =
            AuthFlow::with_mode(test_config(&server), storage.clone(), PkceMode::Disabled).unwrap();

        let url = flow.begin_login().await.unwrap();

        assert!(!url.as_str().contains("code_challenge"));
        assert_eq!(storage.get(KEY_CODE_VERIFIER).await.unwrap(), None);
    }
}

// =============================================================================
// complete_login
// =============================================================================

mod complete_login {
    use super::*;

    #[tokio::test]
    async fn exchange_persists_tokens_and_clears_verifier() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth_code_1"))
            .and(body_string_contains("client_id=client123"))
            .and(body_string_contains("code_verifier="))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body("access1", Some("refresh1"))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let storage = Arc::new(MemoryStore::new());
        let flow = AuthFlow::new(test_config(&server), storage.clone()).unwrap();
        flow.begin_login().await.unwrap();

        let params = CallbackParams::from_query("code=auth_code_1");
        let tokens = flow.complete_login(&params).await.unwrap();

        assert_eq!(tokens.access_token, "access1");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh1"));
        assert!(tokens.expires_at.is_some());

        assert_eq!(
            storage.get(KEY_ACCESS_TOKEN).await.unwrap().as_deref(),
            Some("access1")
        );
        assert_eq!(
            storage.get(KEY_REFRESH_TOKEN).await.unwrap().as_deref(),
            Some("refresh1")
        );
        assert_eq!(storage.get(KEY_CODE_VERIFIER).await.unwrap(), None);
        assert!(flow.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn missing_code_is_rejected() {
        let server = MockServer::start().await;
        let flow = AuthFlow::new(test_config(&server), Arc::new(MemoryStore::new())).unwrap();

        let params = CallbackParams::from_query("");
        match flow.complete_login(&params).await {
            Err(mixlink_auth::AuthError::MissingCode) => {}
            other => panic!("Expected MissingCode, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_denial_is_surfaced() {
        let server = MockServer::start().await;
        let flow = AuthFlow::new(test_config(&server), Arc::new(MemoryStore::new())).unwrap();

        let params = CallbackParams::from_query("error=access_denied");
        match flow.complete_login(&params).await {
            Err(mixlink_auth::AuthError::ProviderDenied(e)) => assert_eq!(e, "access_denied"),
            other => panic!("Expected ProviderDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_verifier_is_rejected_in_pkce_mode() {
        let server = MockServer::start().await;
        let flow = AuthFlow::new(test_config(&server), Arc::new(MemoryStore::new())).unwrap();

        // No begin_login: nothing stored under the verifier key.
        let params = CallbackParams::from_query("code=auth_code_1");
        match flow.complete_login(&params).await {
            Err(mixlink_auth::AuthError::MissingVerifier) => {}
            other => panic!("Expected MissingVerifier, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fallback_exchange_omits_verifier() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body("access1", Some("refresh1"))),
            )
            .mount(&server)
            .await;

        let storage = Arc::new(MemoryStore::new());
        let flow =
            AuthFlow::with_mode(test_config(&server), storage, PkceMode::Disabled).unwrap();

        let params = CallbackParams::from_query("code=auth_code_1");
        let tokens = flow.complete_login(&params).await.unwrap();
        assert_eq!(tokens.access_token, "access1");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body).into_owned();
        assert!(!body.contains("code_verifier"));
    }

    #[tokio::test]
    async fn token_endpoint_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let storage = Arc::new(MemoryStore::new());
        let flow = AuthFlow::new(test_config(&server), storage.clone()).unwrap();
        flow.begin_login().await.unwrap();

        let params = CallbackParams::from_query("code=expired");
        match flow.complete_login(&params).await {
            Err(mixlink_auth::AuthError::TokenEndpoint { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid_grant");
            }
            other => panic!("Expected TokenEndpoint, got {other:?}"),
        }
        // Failed exchange leaves the session logged out
        assert!(!flow.is_authenticated().await.unwrap());
    }
}

// =============================================================================
// refresh
// =============================================================================

mod refresh {
    use super::*;

    #[tokio::test]
    async fn refresh_replaces_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access2", None)))
            .expect(1)
            .mount(&server)
            .await;

        let storage = Arc::new(MemoryStore::new());
        storage.put(KEY_ACCESS_TOKEN, "access1").await.unwrap();
        storage.put(KEY_REFRESH_TOKEN, "refresh1").await.unwrap();

        let flow = AuthFlow::new(test_config(&server), storage.clone()).unwrap();
        let new_token = flow.refresh().await.unwrap();

        assert_eq!(new_token, "access2");
        assert_eq!(
            storage.get(KEY_ACCESS_TOKEN).await.unwrap().as_deref(),
            Some("access2")
        );
        // Refresh token kept when the provider does not rotate it
        assert_eq!(
            storage.get(KEY_REFRESH_TOKEN).await.unwrap().as_deref(),
            Some("refresh1")
        );
    }

    #[tokio::test]
    async fn refresh_without_token_ends_session() {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStore::new());
        storage.put(KEY_ACCESS_TOKEN, "access1").await.unwrap();

        let flow = AuthFlow::new(test_config(&server), storage.clone()).unwrap();
        match flow.refresh().await {
            Err(mixlink_auth::AuthError::RefreshFailed(_)) => {}
            other => panic!("Expected RefreshFailed, got {other:?}"),
        }
        // Session-fatal: everything cleared
        assert_eq!(storage.get(KEY_ACCESS_TOKEN).await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejected_refresh_clears_all_session_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let storage = Arc::new(MemoryStore::new());
        storage.put(KEY_ACCESS_TOKEN, "access1").await.unwrap();
        storage.put(KEY_REFRESH_TOKEN, "stale").await.unwrap();

        let flow = AuthFlow::new(test_config(&server), storage.clone()).unwrap();
        assert!(flow.refresh().await.is_err());

        assert_eq!(storage.get(KEY_ACCESS_TOKEN).await.unwrap(), None);
        assert_eq!(storage.get(KEY_REFRESH_TOKEN).await.unwrap(), None);
        assert!(!flow.is_authenticated().await.unwrap());
    }
}

// =============================================================================
// logout
// =============================================================================

mod logout {
    use super::*;

    #[tokio::test]
    async fn logout_clears_session_without_network() {
        // No mocks mounted: any request would fail the test via connect error.
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStore::new());
        storage.put(KEY_ACCESS_TOKEN, "access1").await.unwrap();
        storage.put(KEY_REFRESH_TOKEN, "refresh1").await.unwrap();
        storage.put(KEY_CODE_VERIFIER, "verifier").await.unwrap();

        let flow = AuthFlow::new(test_config(&server), storage.clone()).unwrap();
        flow.logout().await.unwrap();

        assert_eq!(storage.get(KEY_ACCESS_TOKEN).await.unwrap(), None);
        assert_eq!(storage.get(KEY_REFRESH_TOKEN).await.unwrap(), None);
        assert_eq!(storage.get(KEY_CODE_VERIFIER).await.unwrap(), None);
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }
}
