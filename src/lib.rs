//! # RentWise
//!
//! Client library and terminal front end for the RentWise property
//! management API: properties, leases, tenants and rent payments behind
//! bearer-token authentication.
//!
//! ## Modules
//!
//! - [`session`]: token store, token validity and the route guard
//! - [`client`]: authenticated fetch wrapper over the REST API
//! - [`model`]: typed records parsed at the fetch boundary
//! - [`forms`]: form-state reducer, validation and submission
//! - [`views`]: list/detail view state machines
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rentwise::{ApiClient, AppContext, Access, FileSessionStore, Route, RouteGuard};
//! use rentwise::views::DashboardView;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8000")?;
//!     let store = Arc::new(FileSessionStore::new("session.json"));
//!     let guard = RouteGuard::new(store, Default::default());
//!
//!     if let Access::Granted(session) = guard.check(&Route::Dashboard).await? {
//!         let mut view = DashboardView::new(AppContext::new(client, session));
//!         let state = view.load().await;
//!         println!("{} properties", state.data().properties.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod forms;
pub mod model;
pub mod output;
pub mod routes;
pub mod session;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, ClientError, ClientResult};
pub use config::{Config, ConfigError, LoggingConfig};
pub use context::AppContext;
pub use forms::{FormAction, FormMode, FormState, SubmitError, ValidationErrors};
pub use model::{Lease, LeaseDetail, Payment, Property, PropertyStatus, PropertyType, User};
pub use routes::Route;
pub use session::{
    Access, FileSessionStore, MemorySessionStore, RouteGuard, Session, SessionError,
    SessionStore, StoredTokens, TokenPolicy, TokenStatus,
};
pub use views::{Confirm, Mutation, Phase, ViewState};
