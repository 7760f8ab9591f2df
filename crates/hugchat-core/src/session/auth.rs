//! Four-step login handshake against the remote application.
//!
//! ```text
//! POST /login            → 302   (credentials, sets hub cookies)
//! POST /chat/login       → 303   Location: oauth authorize URL
//! GET  <authorize URL>   → 303   Location: oauth callback URL
//! GET  <callback URL>    → 302   (sets the hf-chat session cookie)
//! ```

use hugchat_types::models::{cookie_header, merge_cookies};
use hugchat_types::{AuthError, SessionCookie};
use reqwest::header::{HeaderValue, ACCEPT, COOKIE, LOCATION, ORIGIN};
use reqwest::{Response, StatusCode};
use url::Url;

use crate::error::GatewayResult;
use crate::remote::HTML_ACCEPT;

/// Runs the login chain with a client that does not follow redirects.
#[derive(Clone)]
pub struct Authenticator {
    client: reqwest::Client,
    domain: String,
}

impl Authenticator {
    pub fn new(client: reqwest::Client, domain: impl Into<String>) -> Self {
        let domain = domain.into().trim_end_matches('/').to_string();
        Self { client, domain }
    }

    /// Log in and return the de-duplicated cookies of every step.
    pub async fn login(&self, username: &str, password: &str) -> GatewayResult<Vec<SessionCookie>> {
        tracing::info!("[Auth] Logging in as '{}'", username);
        let mut jar: Vec<SessionCookie> = Vec::new();

        let response = self
            .client
            .post(format!("{}/login", self.domain))
            .header(ORIGIN, &self.domain)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let response = expect_status(response, "credentials", StatusCode::FOUND)?;
        merge_cookies(&mut jar, response_cookies(&response));

        let response = self
            .client
            .post(format!("{}/chat/login", self.domain))
            .header(ORIGIN, &self.domain)
            .header(ACCEPT, HTML_ACCEPT)
            .header(COOKIE, cookie_header(&jar))
            .form(&[] as &[(&str, &str)])
            .send()
            .await?;
        let response = expect_status(response, "chat login", StatusCode::SEE_OTHER)?;
        merge_cookies(&mut jar, response_cookies(&response));
        let authorize_url = self.location(&response, "chat login")?;

        let response = self
            .client
            .get(authorize_url)
            .header(ORIGIN, &self.domain)
            .header(ACCEPT, HTML_ACCEPT)
            .header(COOKIE, cookie_header(&jar))
            .send()
            .await?;
        let response = expect_status(response, "oauth authorize", StatusCode::SEE_OTHER)?;
        merge_cookies(&mut jar, response_cookies(&response));
        let callback_url = self.location(&response, "oauth authorize")?;

        let response = self
            .client
            .get(callback_url)
            .header(ORIGIN, &self.domain)
            .header(COOKIE, cookie_header(&jar))
            .send()
            .await?;
        let response = expect_status(response, "oauth callback", StatusCode::FOUND)?;
        merge_cookies(&mut jar, response_cookies(&response));

        tracing::info!("[Auth] Login for '{}' produced {} cookie(s)", username, jar.len());
        Ok(jar)
    }

    /// Resolve a step's `Location` header against the remote domain.
    fn location(&self, response: &Response, step: &'static str) -> Result<Url, AuthError> {
        let raw = response
            .headers()
            .get(LOCATION)
            .and_then(|v: &HeaderValue| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingLocation { step })?;

        Url::parse(&self.domain)
            .and_then(|base| base.join(raw))
            .map_err(|_| AuthError::MissingLocation { step })
    }
}

fn expect_status(
    response: Response,
    step: &'static str,
    expected: StatusCode,
) -> Result<Response, AuthError> {
    let status = response.status();
    if status != expected {
        tracing::warn!("[Auth] Step '{}' returned {} (expected {})", step, status, expected);
        return Err(AuthError::LoginStep { step, status: status.as_u16() });
    }
    tracing::debug!("[Auth] Step '{}' ok", step);
    Ok(response)
}

fn response_cookies(response: &Response) -> Vec<SessionCookie> {
    response
        .cookies()
        .map(|c| SessionCookie {
            name: c.name().to_string(),
            value: c.value().to_string(),
            path: c.path().map(str::to_string),
            domain: c.domain().map(str::to_string),
            secure: c.secure(),
            http_only: c.http_only(),
        })
        .collect()
}
