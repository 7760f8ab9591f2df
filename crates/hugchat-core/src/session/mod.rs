//! Session acquisition: the cookie store, the login handshake and the
//! per-identity credential providers built on top of them.

mod auth;
mod provider;
mod store;

pub use auth::Authenticator;
pub use provider::{
    provider_for, AccountCredentials, CredentialProvider, TokenCredentials,
};
pub use store::{SessionStore, TOKEN_IDENTITY_KEY};
