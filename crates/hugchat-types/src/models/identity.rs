//! Caller identity decoded from the inbound bearer credential.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::AuthError;

static ACCOUNT_REGEX: OnceLock<Regex> = OnceLock::new();

fn account_regex() -> &'static Regex {
    ACCOUNT_REGEX.get_or_init(|| {
        Regex::new(r"username=(.+?)&password=(.+)").expect("Account regex is valid")
    })
}

/// Who the gateway acts as on the remote application.
///
/// A bearer value that decodes as standard base64 must carry
/// `username=<u>&password=<p>`; anything else is treated as an opaque
/// session token.
#[derive(Clone, PartialEq, Eq)]
pub enum Identity {
    /// Opaque `hf-chat` session token.
    Token { token: String },
    /// Account credentials used to run the login handshake.
    Account { username: String, password: String },
}

impl Identity {
    pub fn from_bearer(credential: &str) -> Result<Self, AuthError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        match STANDARD.decode(credential) {
            Ok(raw) => {
                let decoded = String::from_utf8(raw).map_err(|_| AuthError::InvalidCredential)?;
                let caps =
                    account_regex().captures(&decoded).ok_or(AuthError::InvalidCredential)?;
                Ok(Self::Account {
                    username: caps[1].to_string(),
                    password: caps[2].to_string(),
                })
            },
            Err(_) => Ok(Self::Token { token: credential.to_string() }),
        }
    }

    /// Parse an `Authorization` header value (`Bearer <credential>`).
    pub fn from_authorization(header: &str) -> Result<Self, AuthError> {
        let credential = header.strip_prefix("Bearer ").unwrap_or(header);
        Self::from_bearer(credential)
    }

    /// Human-readable label for logs. Never includes secrets.
    pub fn label(&self) -> &str {
        match self {
            Self::Token { .. } => "<session-token>",
            Self::Account { username, .. } => username,
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token { .. } => f.debug_struct("Token").finish_non_exhaustive(),
            Self::Account { username, .. } => {
                f.debug_struct("Account").field("username", username).finish_non_exhaustive()
            },
        }
    }
}
