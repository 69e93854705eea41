//! Per-screen dependencies
//!
//! Views and forms receive an [`AppContext`] when they are built. It is
//! the only way they reach the API or the session.

use crate::client::ApiClient;
use crate::session::Session;

/// API client plus the session it authenticates with
#[derive(Debug, Clone)]
pub struct AppContext {
    pub client: ApiClient,
    pub session: Session,
}

impl AppContext {
    pub fn new(client: ApiClient, session: Session) -> Self {
        Self { client, session }
    }
}
