use super::{validate, FieldSpec, FormAction, FormState, Rule, SubmitError, ValidationErrors};
use crate::client::{ApiClient, ClientError};
use crate::model::RegisterPayload;
use crate::routes::Route;

pub const USERNAME: &str = "username";
pub const EMAIL: &str = "email";
pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const PHONE_NUMBER: &str = "phone_number";
pub const PASSWORD: &str = "password";
pub const RE_PASSWORD: &str = "re_password";

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: USERNAME,
        label: "Username",
        rules: &[Rule::Required],
    },
    FieldSpec {
        name: EMAIL,
        label: "Email",
        rules: &[Rule::Required, Rule::Email],
    },
    FieldSpec {
        name: PASSWORD,
        label: "Password",
        rules: &[Rule::Required, Rule::MinLength(8)],
    },
    FieldSpec {
        name: RE_PASSWORD,
        label: "Confirm password",
        rules: &[
            Rule::Required,
            Rule::Matches {
                field: PASSWORD,
                message: "Passwords do not match",
            },
        ],
    },
];

const UNREACHABLE: &str = "Registration failed. Please try again later.";

/// Account sign-up
pub struct RegisterForm {
    client: ApiClient,
    state: FormState,
    errors: ValidationErrors,
    banner: Option<String>,
}

impl RegisterForm {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
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

    /// Create the account; the login screen is next
    pub async fn submit(&mut self) -> Result<Route, SubmitError> {
        self.banner = None;
        self.errors = validate(FIELDS, &self.state);
        if !self.errors.is_empty() {
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        let text = |field: &str| self.state.text(field).trim().to_string();
        let payload = RegisterPayload {
            username: text(USERNAME),
            email: text(EMAIL),
            first_name: text(FIRST_NAME),
            last_name: text(LAST_NAME),
            phone_number: text(PHONE_NUMBER),
            password: self.state.text(PASSWORD).to_string(),
            re_password: self.state.text(RE_PASSWORD).to_string(),
        };

        match self.client.register(&payload).await {
            Ok(_) => {
                tracing::info!(username = %payload.username, "Account registered");
                Ok(Route::Login)
            }
            Err(e) => {
                let message = match e {
                    ClientError::Network(_) => UNREACHABLE.to_string(),
                    other => other.to_string(),
                };
                self.banner = Some(message.clone());
                Err(SubmitError::Rejected(message))
            }
        }
    }
}
