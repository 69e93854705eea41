//! Route guard
//!
//! Checks the token store before a protected screen is built. A valid
//! token becomes a [`Session`]; anything else sends the user to the
//! login route.

use chrono::Utc;
use std::sync::Arc;

use super::token::{self, TokenPolicy, TokenStatus};
use super::{Session, SessionError, SessionStore};
use crate::routes::Route;

/// Outcome of a guard check
#[derive(Debug, Clone)]
pub enum Access {
    /// The route needs no session
    Public,
    /// The route may be shown with this session
    Granted(Session),
    /// The route must not be shown; go here instead
    Redirect(Route),
}

/// Guards protected routes against missing or invalid tokens
#[derive(Clone)]
pub struct RouteGuard {
    store: Arc<dyn SessionStore>,
    policy: TokenPolicy,
}

impl RouteGuard {
    pub fn new(store: Arc<dyn SessionStore>, policy: TokenPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Inspect the stored access token
    pub async fn status(&self) -> Result<TokenStatus, SessionError> {
        let tokens = self.store.load().await?;
        Ok(token::inspect(tokens.access.as_deref(), self.policy, Utc::now()))
    }

    /// True iff a usable access token is stored
    pub async fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.status().await?.is_valid())
    }

    /// Decide whether `route` may be shown
    pub async fn check(&self, route: &Route) -> Result<Access, SessionError> {
        if !route.is_protected() {
            return Ok(Access::Public);
        }

        let tokens = self.store.load().await?;
        let status = token::inspect(tokens.access.as_deref(), self.policy, Utc::now());

        match Session::from_tokens(&tokens, &status) {
            Some(session) => Ok(Access::Granted(session)),
            None => {
                tracing::info!(route = %route, status = %status, "Redirecting to login");
                if matches!(status, TokenStatus::Expired { .. } | TokenStatus::Placeholder) {
                    self.store.clear().await?;
                }
                Ok(Access::Redirect(Route::Login))
            }
        }
    }

    /// Drop the stored tokens
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.clear().await?;
        tracing::info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token::jwt_with_exp;
    use crate::session::{MemorySessionStore, StoredTokens};
    use chrono::Duration;

    fn guard_with(access: Option<&str>, policy: TokenPolicy) -> (RouteGuard, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::with_tokens(StoredTokens {
            access: access.map(String::from),
            refresh: Some("refresh".to_string()),
            username: Some("anna".to_string()),
        }));
        (RouteGuard::new(store.clone(), policy), store)
    }

    #[tokio::test]
    async fn test_public_route_needs_no_token() {
        let (guard, _) = guard_with(None, TokenPolicy::Expiry);
        assert!(matches!(guard.check(&Route::Login).await.unwrap(), Access::Public));
        assert!(matches!(guard.check(&Route::Register).await.unwrap(), Access::Public));
    }

    #[tokio::test]
    async fn test_missing_token_redirects() {
        let (guard, _) = guard_with(None, TokenPolicy::Expiry);
        assert!(matches!(
            guard.check(&Route::Dashboard).await.unwrap(),
            Access::Redirect(Route::Login)
        ));
        assert!(!guard.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_placeholder_redirects_and_clears() {
        let (guard, store) = guard_with(Some("undefined"), TokenPolicy::Presence);
        assert!(matches!(
            guard.check(&Route::LeaseDetail(1)).await.unwrap(),
            Access::Redirect(Route::Login)
        ));
        assert_eq!(store.load().await.unwrap(), StoredTokens::default());
    }

    #[tokio::test]
    async fn test_valid_token_grants_session() {
        let (guard, _) = guard_with(Some("opaque-token"), TokenPolicy::Expiry);
        match guard.check(&Route::Dashboard).await.unwrap() {
            Access::Granted(session) => {
                assert_eq!(session.access_token(), "opaque-token");
                assert_eq!(session.username(), Some("anna"));
                assert_eq!(session.refresh_token(), Some("refresh"));
            }
            other => panic!("expected session, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_expired_token_redirects_and_clears() {
        let token = jwt_with_exp((Utc::now() - Duration::hours(1)).timestamp());
        let (guard, store) = guard_with(Some(&token), TokenPolicy::Expiry);

        assert!(matches!(
            guard.check(&Route::PropertyAdd).await.unwrap(),
            Access::Redirect(Route::Login)
        ));
        assert!(store.load().await.unwrap().access.is_none());
    }

    #[tokio::test]
    async fn test_presence_policy_ignores_expiry() {
        let token = jwt_with_exp((Utc::now() - Duration::hours(1)).timestamp());
        let (guard, _) = guard_with(Some(&token), TokenPolicy::Presence);

        assert!(matches!(
            guard.check(&Route::Dashboard).await.unwrap(),
            Access::Granted(_)
        ));
    }

    #[tokio::test]
    async fn test_logout() {
        let (guard, store) = guard_with(Some("opaque-token"), TokenPolicy::Expiry);
        guard.logout().await.unwrap();
        assert_eq!(store.load().await.unwrap(), StoredTokens::default());
        assert!(!guard.is_authenticated().await.unwrap());
    }
}
