//! The authorization-code flow orchestrator.

use crate::error::{AuthError, Result};
use crate::pkce::{self, PkceMode};
use crate::types::{CallbackParams, TokenResponse, TokenSet};
use mixlink_core::keys::{KEY_ACCESS_TOKEN, KEY_AUTH_CODE, KEY_CODE_VERIFIER, KEY_REFRESH_TOKEN};
use mixlink_core::{ClientConfig, KeyValueStore};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Orchestrates PKCE login, token exchange, and refresh.
///
/// Session state lives in the injected [`KeyValueStore`]; the flow itself
/// holds no tokens. States move `LoggedOut -> AwaitingCallback` (verifier
/// stored) `-> LoggedIn` (tokens stored) and back to `LoggedOut` on logout
/// or unrecoverable refresh failure.
pub struct AuthFlow {
    http: Client,
    config: ClientConfig,
    storage: Arc<dyn KeyValueStore>,
    mode: PkceMode,
}

impl AuthFlow {
    /// Create a flow with PKCE support detected once up front.
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::with_mode(config, storage, PkceMode::detect())
    }

    /// Create a flow with an explicit PKCE mode.
    ///
    /// `PkceMode::Disabled` reproduces the original client's fallback for
    /// user agents without a digest primitive: the challenge and verifier
    /// parameters are omitted and the provider falls back to a plain
    /// authorization-code exchange.
    pub fn with_mode(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
        mode: PkceMode,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("mixlink/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            storage,
            mode,
        })
    }

    /// The PKCE mode this flow was built with.
    pub fn mode(&self) -> PkceMode {
        self.mode
    }

    /// Start a login attempt and return the authorize URL to navigate to.
    ///
    /// A fresh verifier is generated and persisted on every call; verifiers
    /// are never reused across attempts. Navigating the user agent to the
    /// returned URL is the caller's side effect.
    pub async fn begin_login(&self) -> Result<Url> {
        let mut url = Url::parse(&self.config.authorize_endpoint())
            .map_err(|e| AuthError::Parse(format!("authorize endpoint: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("scope", &self.config.scope_param())
                .append_pair("redirect_uri", &self.config.redirect_uri);

            if let PkceMode::S256 { verifier_len } = self.mode {
                let verifier = pkce::generate_verifier(verifier_len);
                let challenge = pkce::code_challenge(&verifier);
                query
                    .append_pair("code_challenge_method", "S256")
                    .append_pair("code_challenge", &challenge);
                drop(query);
                self.storage.put(KEY_CODE_VERIFIER, &verifier).await?;
            }
        }

        debug!(mode = ?self.mode, "Login started");
        Ok(url)
    }

    /// Complete a login from the provider's callback.
    ///
    /// Exchanges the authorization code for tokens, persists them, and
    /// clears the verifier so it can never be replayed.
    pub async fn complete_login(&self, params: &CallbackParams) -> Result<TokenSet> {
        if let Some(error) = &params.error {
            warn!(error = %error, "Provider denied authorization");
            return Err(AuthError::ProviderDenied(error.clone()));
        }
        let code = params.code.as_deref().ok_or(AuthError::MissingCode)?;

        let verifier = match self.mode {
            PkceMode::S256 { .. } => Some(
                self.storage
                    .get(KEY_CODE_VERIFIER)
                    .await?
                    .ok_or(AuthError::MissingVerifier)?,
            ),
            PkceMode::Disabled => None,
        };

        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.config.redirect_uri),
            ("client_id", &self.config.client_id),
        ];
        if let Some(verifier) = verifier.as_deref() {
            form.push(("code_verifier", verifier));
        }

        let tokens = self.token_request(&form).await?;

        self.storage
            .put(KEY_ACCESS_TOKEN, &tokens.access_token)
            .await?;
        if let Some(refresh) = &tokens.refresh_token {
            self.storage.put(KEY_REFRESH_TOKEN, refresh).await?;
        }
        self.storage.put(KEY_AUTH_CODE, code).await?;
        // The verifier is single-use: gone as soon as the exchange lands.
        self.storage.remove(KEY_CODE_VERIFIER).await?;

        info!("Login completed");
        Ok(tokens)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// This is session-fatal on failure: all persisted session state is
    /// cleared and the caller must require a full re-login.
    pub async fn refresh(&self) -> Result<String> {
        let Some(refresh_token) = self.storage.get(KEY_REFRESH_TOKEN).await? else {
            self.clear_session().await?;
            return Err(AuthError::RefreshFailed("no refresh token held".into()));
        };

        let form: Vec<(&str, &str)> = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", &refresh_token),
            ("client_id", &self.config.client_id),
        ];

        match self.token_request(&form).await {
            Ok(tokens) => {
                self.storage
                    .put(KEY_ACCESS_TOKEN, &tokens.access_token)
                    .await?;
                if let Some(rotated) = &tokens.refresh_token {
                    self.storage.put(KEY_REFRESH_TOKEN, rotated).await?;
                }
                debug!("Access token refreshed");
                Ok(tokens.access_token)
            }
            Err(e) => {
                warn!(error = %e, "Refresh exchange failed, ending session");
                self.clear_session().await?;
                Err(AuthError::RefreshFailed(e.to_string()))
            }
        }
    }

    /// The currently persisted access token, if any.
    pub async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.storage.get(KEY_ACCESS_TOKEN).await?)
    }

    /// Whether a login has completed and an access token is held.
    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.access_token().await?.is_some())
    }

    /// Clear all persisted session state. No network call.
    pub async fn logout(&self) -> Result<()> {
        self.clear_session().await?;
        info!("Logged out");
        Ok(())
    }

    async fn clear_session(&self) -> Result<()> {
        self.storage.remove(KEY_ACCESS_TOKEN).await?;
        self.storage.remove(KEY_REFRESH_TOKEN).await?;
        self.storage.remove(KEY_AUTH_CODE).await?;
        self.storage.remove(KEY_CODE_VERIFIER).await?;
        Ok(())
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenSet> {
        let url = self.config.token_endpoint();
        let response = self.http.post(&url).form(form).send().await?;

        let status = response.status();
        if status.is_success() {
            let body: TokenResponse = response
                .json()
                .await
                .map_err(|e| AuthError::Parse(format!("token response: {e}")))?;
            Ok(TokenSet::from_response(body))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                message,
            })
        }
    }
}
