//! View state machine
//!
//! ```text
//! Loading ──▶ Ready ◀──▶ Mutating
//!    │          │            │
//!    ▼          ▼            ▼
//! Failed    Redirect(Login) Failed
//! ```

use crate::client::{ClientError, ClientResult};
use crate::routes::Route;

/// Where a view is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Mutating,
    Failed,
    Redirect(Route),
}

/// Result of a user action on a loaded view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The user declined the confirmation; nothing was sent
    Cancelled,
    /// The server confirmed and local state was updated
    Applied,
    /// The request failed; local state is unchanged
    Failed,
    /// The view was not in a state that accepts actions
    NotReady,
}

/// Data of a view plus its phase and the one error it may show
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    phase: Phase,
    data: T,
    error: Option<String>,
}

impl<T: Default> Default for ViewState<T> {
    fn default() -> Self {
        Self::loading()
    }
}

impl<T: Default> ViewState<T> {
    pub fn loading() -> Self {
        Self {
            phase: Phase::Loading,
            data: T::default(),
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    /// Banner text, present only in the failed phase
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Settle a load: data on success, one message or a redirect otherwise
    pub(crate) fn settle(&mut self, result: ClientResult<T>, message: &str) {
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
                self.phase = Phase::Ready;
            }
            Err(e) => self.fail(e, message),
        }
    }

    /// Enter the mutating phase; false if the view is not ready
    pub(crate) fn begin_mutation(&mut self) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        self.phase = Phase::Mutating;
        true
    }

    /// Leave the mutating phase, applying `update` only on success
    pub(crate) fn finish_mutation(
        &mut self,
        result: ClientResult<()>,
        message: &str,
        update: impl FnOnce(&mut T),
    ) -> Mutation {
        match result {
            Ok(()) => {
                update(&mut self.data);
                self.phase = Phase::Ready;
                Mutation::Applied
            }
            Err(ClientError::Unauthorized { .. }) => {
                self.redirect_to_login();
                Mutation::Failed
            }
            Err(e) => {
                tracing::warn!(error = %e, "{message}");
                self.error = Some(message.to_string());
                self.phase = Phase::Failed;
                Mutation::Failed
            }
        }
    }

    /// Record a failed side request (e.g. a download); loaded data is kept
    pub(crate) fn observe<U>(&mut self, result: ClientResult<U>, message: &str) -> ClientResult<U> {
        if let Err(e) = &result {
            if e.is_auth() {
                self.redirect_to_login();
            } else {
                tracing::warn!(error = %e, "{message}");
                self.error = Some(message.to_string());
                self.phase = Phase::Failed;
            }
        }
        result
    }

    fn fail(&mut self, error: ClientError, message: &str) {
        if error.is_auth() {
            self.redirect_to_login();
            return;
        }
        tracing::warn!(error = %error, "{message}");
        self.data = T::default();
        self.error = Some(message.to_string());
        self.phase = Phase::Failed;
    }

    fn redirect_to_login(&mut self) {
        self.data = T::default();
        self.error = None;
        self.phase = Phase::Redirect(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_success() {
        let mut state: ViewState<Vec<i32>> = ViewState::loading();
        assert_eq!(state.phase(), Phase::Loading);

        state.settle(Ok(vec![1, 2]), "Failed to load.");
        assert!(state.is_ready());
        assert_eq!(state.data(), &vec![1, 2]);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_load_failure_has_one_message_and_no_data() {
        let mut state: ViewState<Vec<i32>> = ViewState::loading();
        state.settle(
            Err(ClientError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
            "Failed to load.",
        );
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error(), Some("Failed to load."));
        assert!(state.data().is_empty());
    }

    #[test]
    fn test_unauthorized_redirects() {
        let mut state: ViewState<Vec<i32>> = ViewState::loading();
        state.settle(
            Err(ClientError::Unauthorized {
                message: "expired".to_string(),
            }),
            "Failed to load.",
        );
        assert_eq!(state.phase(), Phase::Redirect(Route::Login));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_mutation_only_from_ready() {
        let mut state: ViewState<Vec<i32>> = ViewState::loading();
        assert!(!state.begin_mutation());

        state.settle(Ok(vec![1, 2, 3]), "");
        assert!(state.begin_mutation());
        assert_eq!(state.phase(), Phase::Mutating);
        assert!(!state.begin_mutation());

        let outcome = state.finish_mutation(Ok(()), "", |items| items.retain(|i| *i != 2));
        assert_eq!(outcome, Mutation::Applied);
        assert_eq!(state.data(), &vec![1, 3]);
        assert!(state.is_ready());
    }

    #[test]
    fn test_failed_mutation_keeps_data() {
        let mut state: ViewState<Vec<i32>> = ViewState::loading();
        state.settle(Ok(vec![1, 2]), "");
        state.begin_mutation();

        let outcome = state.finish_mutation(
            Err(ClientError::Api {
                status: 500,
                message: "nope".to_string(),
            }),
            "Failed to delete.",
            |items| items.clear(),
        );
        assert_eq!(outcome, Mutation::Failed);
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.data(), &vec![1, 2]);
        assert_eq!(state.error(), Some("Failed to delete."));
    }
}
