//! mixlink Auth
//!
//! OAuth2 authorization-code flow with PKCE against the Spotify accounts
//! service.
//!
//! # Flow
//!
//! 1. `begin_login` generates and persists a PKCE verifier and returns the
//!    authorize URL the user agent must navigate to.
//! 2. The provider redirects back to `{origin}/callback` with a `code` (or
//!    `error`) query parameter.
//! 3. `complete_login` exchanges the code for an access/refresh token pair
//!    and clears the verifier.
//! 4. `refresh` trades the refresh token for a new access token when the
//!    provider signals expiry; failure ends the session.
//!
//! # Example
//!
//! ```ignore
//! use mixlink_auth::{AuthFlow, CallbackParams};
//! use mixlink_core::{ClientConfig, FileStore};
//! use std::sync::Arc;
//!
//! let config = ClientConfig::new("client-id", "https://mixlink.example");
//! let storage = Arc::new(FileStore::new("mixlink.json"));
//! let flow = AuthFlow::new(config, storage)?;
//!
//! let authorize_url = flow.begin_login().await?;
//! println!("Open {authorize_url} in a browser");
//!
//! // ...after the provider redirects back:
//! let params = CallbackParams::from_url("https://mixlink.example/callback?code=abc")?;
//! let tokens = flow.complete_login(&params).await?;
//! println!("Logged in, token expires at {:?}", tokens.expires_at);
//! ```

mod error;
mod flow;
mod pkce;
mod types;

// Re-export main types
pub use error::{AuthError, Result};
pub use flow::AuthFlow;
pub use pkce::{code_challenge, generate_verifier, PkceMode, VERIFIER_LEN};
pub use types::{CallbackParams, TokenSet};
