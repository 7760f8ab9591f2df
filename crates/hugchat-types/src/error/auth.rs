//! Authentication errors.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while turning an Identity into a working session.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum AuthError {
    /// No bearer credential on the inbound request
    #[error("Missing bearer credential")]
    MissingCredential,

    /// The bearer value decoded as base64 but was not `username=…&password=…`
    #[error("Invalid credential format")]
    InvalidCredential,

    /// A step of the login handshake answered with an unexpected status
    #[error("Login step '{step}' failed with status {status}")]
    LoginStep {
        /// Human-readable step name
        step: &'static str,
        /// Status the remote returned
        status: u16,
    },

    /// A redirecting login step had no usable `Location` header
    #[error("Login step '{step}' returned no redirect location")]
    MissingLocation {
        /// Human-readable step name
        step: &'static str,
    },

    /// Raw session tokens cannot be renewed
    #[error("Cannot refresh a raw session token")]
    CannotRefresh,

    /// The remote still reports the session as logged out after a refresh
    #[error("Remote rejected the session after re-login")]
    LoginRejected,
}
