//! Entity forms
//!
//! A form owns a [`FormState`] that only changes through
//! [`FormAction`]s. Submitting validates locally first; invalid input
//! never reaches the network.
//!
//! - [`PropertyForm`], [`LeaseForm`], [`PaymentForm`]: create/edit a record
//! - [`LoginForm`]: obtain and store tokens
//! - [`RegisterForm`]: create an account

pub mod lease;
pub mod login;
pub mod payment;
pub mod property;
pub mod register;
mod state;
mod validation;

pub use lease::LeaseFields;
pub use login::LoginForm;
pub use payment::PaymentFields;
pub use property::PropertyFields;
pub use register::RegisterForm;
pub use state::{FieldValue, FormAction, FormState, Snapshot};
pub use validation::{validate, FieldSpec, Rule, ValidationErrors};

use serde::Serialize;
use std::marker::PhantomData;
use std::str::FromStr;
use thiserror::Error;

use crate::client::{ClientError, ClientResult};
use crate::context::AppContext;
use crate::model::Resource;
use crate::routes::Route;
use crate::session::SessionError;

/// Errors that stop a submission
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Local validation failed; nothing was sent
    #[error("Invalid input: {0}")]
    Invalid(ValidationErrors),

    /// The server refused or could not be reached; the text is the banner
    #[error("{0}")]
    Rejected(String),

    /// The session is no longer accepted
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl SubmitError {
    /// Where the caller should go instead of staying on the form
    pub fn redirect(&self) -> Option<Route> {
        match self {
            SubmitError::Unauthenticated => Some(Route::Login),
            _ => None,
        }
    }

    /// Map a failed request, prefixing the server's text with `context`
    pub(crate) fn from_client(error: ClientError, context: &str) -> Self {
        if error.is_auth() {
            SubmitError::Unauthenticated
        } else {
            SubmitError::Rejected(format!("{context} {error}"))
        }
    }
}

/// Whether a form creates a record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit(_) => "update",
        }
    }
}

/// Field schema and payload mapping of one record type
pub trait EntityFields: Send + Sync + 'static {
    type Record: Resource + Clone;
    type Payload: Serialize + Send + Sync;

    /// Fields and rules for `mode`
    fn fields(mode: FormMode) -> &'static [FieldSpec];

    /// Build the request body from validated state
    fn payload(state: &FormState, mode: FormMode) -> Result<Self::Payload, ValidationErrors>;

    /// Form values for an existing record
    fn snapshot(record: &Self::Record) -> Snapshot;
}

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct Submission<T> {
    pub record: T,
    pub next: Route,
}

/// Create/edit form for one record type
pub struct Form<F: EntityFields> {
    ctx: AppContext,
    mode: FormMode,
    state: FormState,
    errors: ValidationErrors,
    banner: Option<String>,
    _fields: PhantomData<F>,
}

pub type PropertyForm = Form<PropertyFields>;
pub type LeaseForm = Form<LeaseFields>;
pub type PaymentForm = Form<PaymentFields>;

impl<F: EntityFields> Form<F> {
    /// Empty form for a new record
    pub fn create(ctx: AppContext) -> Self {
        Self::with_mode(ctx, FormMode::Create)
    }

    /// Form filled from the record with `id`
    pub async fn edit(ctx: AppContext, id: i64) -> Result<Self, SubmitError> {
        let record: F::Record = ctx
            .client
            .fetch(&ctx.session, id)
            .await
            .map_err(|e| {
                SubmitError::from_client(e, &format!("Failed to load {}.", F::Record::NOUN))
            })?;

        let mut form = Self::with_mode(ctx, FormMode::Edit(id));
        form.dispatch(F::snapshot(&record).into_action());
        Ok(form)
    }

    fn with_mode(ctx: AppContext, mode: FormMode) -> Self {
        Self {
            ctx,
            mode,
            state: FormState::new(),
            errors: ValidationErrors::new(),
            banner: None,
            _fields: PhantomData,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Field errors from the last validation
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Message from the last failed submission
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dispatch(&mut self, action: FormAction) {
        self.state.apply(action);
    }

    /// Run validation and keep the result; true when submittable
    pub fn validate(&mut self) -> bool {
        self.errors = validate(F::fields(self.mode), &self.state);
        self.errors.is_empty()
    }

    /// Validate, then create or update the record
    pub async fn submit(&mut self) -> Result<Submission<F::Record>, SubmitError> {
        self.banner = None;
        if !self.validate() {
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        let payload = F::payload(&self.state, self.mode).map_err(|errors| {
            self.errors = errors.clone();
            SubmitError::Invalid(errors)
        })?;

        let client = &self.ctx.client;
        let session = &self.ctx.session;
        let result: ClientResult<F::Record> = match self.mode {
            FormMode::Create => {
                client
                    .post(session, &F::Record::collection_path(), &payload)
                    .await
            }
            FormMode::Edit(id) => client.put(session, &F::Record::item_path(id), &payload).await,
        };

        match result {
            Ok(record) => {
                tracing::info!(
                    kind = F::Record::NOUN,
                    action = self.mode.verb(),
                    "Record saved"
                );
                Ok(Submission {
                    record,
                    next: Route::Dashboard,
                })
            }
            Err(e) => {
                let context = format!("Failed to {} {}.", self.mode.verb(), F::Record::NOUN);
                let error = SubmitError::from_client(e, &context);
                if let SubmitError::Rejected(message) = &error {
                    self.banner = Some(message.clone());
                }
                Err(error)
            }
        }
    }
}

/// Parse a field that validation already accepted
pub(crate) fn parse_field<T: FromStr>(
    state: &FormState,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match state.text(field).trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "Invalid value");
            None
        }
    }
}

/// Parse a date field that validation already accepted
pub(crate) fn parse_date(
    state: &FormState,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<chrono::NaiveDate> {
    match crate::model::date_format::parse(state.text(field)) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Invalid date");
            None
        }
    }
}
