use std::sync::Arc;

use super::{validate, FieldSpec, FormAction, FormState, Rule, SubmitError, ValidationErrors};
use crate::client::{ApiClient, ClientError};
use crate::model::Credentials;
use crate::routes::Route;
use crate::session::{SessionStore, StoredTokens};

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: USERNAME,
        label: "Username",
        rules: &[Rule::Required],
    },
    FieldSpec {
        name: PASSWORD,
        label: "Password",
        rules: &[Rule::Required],
    },
];

const LOGIN_FAILED: &str = "Login failed. Please check your username and password.";

/// Exchanges credentials for tokens and writes them to the store
pub struct LoginForm {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    state: FormState,
    errors: ValidationErrors,
    banner: Option<String>,
}

impl LoginForm {
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            state: FormState::new(),
            errors: ValidationErrors::new(),
            banner: None,
        }
    }

    pub fn dispatch(&mut self, action: FormAction) {
        self.state.apply(action);
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Log in; on success the tokens are stored and the dashboard is next
    pub async fn submit(&mut self) -> Result<Route, SubmitError> {
        self.banner = None;
        self.errors = validate(FIELDS, &self.state);
        if !self.errors.is_empty() {
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        let credentials = Credentials {
            username: self.state.text(USERNAME).trim().to_string(),
            password: self.state.text(PASSWORD).to_string(),
        };

        let pair = match self.client.obtain_token(&credentials).await {
            Ok(pair) => pair,
            Err(e) => {
                if !matches!(e, ClientError::Unauthorized { .. } | ClientError::Api { .. }) {
                    tracing::warn!(error = %e, "Login request failed");
                }
                self.banner = Some(LOGIN_FAILED.to_string());
                return Err(SubmitError::Rejected(LOGIN_FAILED.to_string()));
            }
        };

        self.store
            .save(&StoredTokens {
                access: Some(pair.access),
                refresh: pair.refresh,
                username: Some(credentials.username.clone()),
            })
            .await?;

        tracing::info!(username = %credentials.username, "Logged in");
        Ok(Route::Dashboard)
    }
}
