//! Credential providers: turn an Identity into session cookies.

use async_trait::async_trait;
use hugchat_types::models::has_session_cookie;
use hugchat_types::{AuthError, Identity, SessionCookie};
use std::sync::Arc;

use super::{Authenticator, SessionStore, TOKEN_IDENTITY_KEY};
use crate::error::GatewayResult;

/// Source of session cookies for one identity.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Key the identity is stored under.
    fn identity_key(&self) -> &str;

    /// Current cookies: cached when possible, otherwise freshly acquired.
    async fn cookies(&self) -> GatewayResult<Vec<SessionCookie>>;

    /// Discard the current session and acquire a new one.
    async fn refresh(&self) -> GatewayResult<Vec<SessionCookie>>;
}

/// A raw `hf-chat` token. Cannot be refreshed.
pub struct TokenCredentials {
    token: String,
}

impl TokenCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl CredentialProvider for TokenCredentials {
    fn identity_key(&self) -> &str {
        TOKEN_IDENTITY_KEY
    }

    async fn cookies(&self) -> GatewayResult<Vec<SessionCookie>> {
        Ok(vec![SessionCookie::from_token(self.token.as_str())])
    }

    async fn refresh(&self) -> GatewayResult<Vec<SessionCookie>> {
        Err(AuthError::CannotRefresh.into())
    }
}

/// Username and password, cached in the session store.
pub struct AccountCredentials {
    username: String,
    password: String,
    store: Arc<SessionStore>,
    authenticator: Authenticator,
}

impl AccountCredentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        store: Arc<SessionStore>,
        authenticator: Authenticator,
    ) -> Self {
        Self { username: username.into(), password: password.into(), store, authenticator }
    }
}

#[async_trait]
impl CredentialProvider for AccountCredentials {
    fn identity_key(&self) -> &str {
        &self.username
    }

    async fn cookies(&self) -> GatewayResult<Vec<SessionCookie>> {
        let cached = self.store.get(&self.username);
        if has_session_cookie(&cached) {
            tracing::debug!("[Session] Cache hit for '{}'", self.username);
            return Ok(cached);
        }
        tracing::debug!("[Session] Cache miss for '{}'", self.username);
        self.refresh().await
    }

    async fn refresh(&self) -> GatewayResult<Vec<SessionCookie>> {
        let cookies = self.authenticator.login(&self.username, &self.password).await?;
        self.store.set(&self.username, cookies.clone())?;
        Ok(cookies)
    }
}

/// Pick the provider matching an identity.
pub fn provider_for(
    identity: Identity,
    store: Arc<SessionStore>,
    authenticator: Authenticator,
) -> Arc<dyn CredentialProvider> {
    match identity {
        Identity::Token { token } => Arc::new(TokenCredentials::new(token)),
        Identity::Account { username, password } => {
            Arc::new(AccountCredentials::new(username, password, store, authenticator))
        },
    }
}
