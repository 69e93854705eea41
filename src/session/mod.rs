//! Session handling
//!
//! - **Store**: where the tokens live between runs
//! - **Token**: validity rules for a stored access token
//! - **Guard**: turns stored tokens into a [`Session`] or a redirect
//!
//! A [`Session`] is an explicit value handed to every view and form; no
//! code reads the store behind the caller's back.

mod guard;
mod store;
pub mod token;

pub use guard::{Access, RouteGuard};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoredTokens};
pub use token::{TokenPolicy, TokenStatus};

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// An authenticated session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access: String,
    refresh: Option<String>,
    username: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Build a session around an access token without inspecting it
    pub fn new(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: None,
            username: None,
            expires_at: None,
        }
    }

    /// Build a session from stored tokens already judged valid
    pub(crate) fn from_tokens(tokens: &StoredTokens, status: &TokenStatus) -> Option<Self> {
        match status {
            TokenStatus::Valid { expires_at } => Some(Self {
                access: tokens.access.as_deref()?.trim().to_string(),
                refresh: tokens.refresh.clone(),
                username: tokens.username.clone(),
                expires_at: *expires_at,
            }),
            _ => None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Value of the `Authorization` header
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access", &"<redacted>")
            .field("username", &self.username)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Errors from the token store
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file {path:?}: {error}")]
    Corrupt { path: PathBuf, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("secret-token").with_username("anna");
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("anna"));
        assert_eq!(session.bearer(), "Bearer secret-token");
    }

    #[test]
    fn test_from_tokens_requires_valid_status() {
        let tokens = StoredTokens {
            access: Some(" tok ".to_string()),
            refresh: None,
            username: None,
        };
        assert!(Session::from_tokens(&tokens, &TokenStatus::Missing).is_none());

        let session =
            Session::from_tokens(&tokens, &TokenStatus::Valid { expires_at: None }).unwrap();
        assert_eq!(session.access_token(), "tok");
    }
}
