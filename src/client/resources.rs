//! Typed endpoint calls
//!
//! Thin wrappers binding endpoint paths to record types.

use super::{ApiClient, ClientResult};
use crate::model::{
    Credentials, LeaseDetail, RegisterPayload, Resource, TokenPair, User,
};
use crate::session::Session;

impl ApiClient {
    /// List a collection
    pub async fn list<R: Resource>(&self, session: &Session) -> ClientResult<Vec<R>> {
        self.get(session, &R::collection_path()).await
    }

    /// Fetch one item
    pub async fn fetch<R: Resource>(&self, session: &Session, id: i64) -> ClientResult<R> {
        self.get(session, &R::item_path(id)).await
    }

    /// Delete one item
    pub async fn remove<R: Resource>(&self, session: &Session, id: i64) -> ClientResult<()> {
        self.delete(session, &R::item_path(id)).await
    }

    /// Lease with its payments embedded
    pub async fn lease_detail(&self, session: &Session, id: i64) -> ClientResult<LeaseDetail> {
        self.get(session, &<crate::model::Lease as Resource>::item_path(id)).await
    }

    /// Contract PDF for a lease
    pub async fn lease_contract(&self, session: &Session, id: i64) -> ClientResult<Vec<u8>> {
        self.get_bytes(session, &LeaseDetail::contract_path(id)).await
    }

    /// Users that can be picked as tenants
    pub async fn list_users(&self, session: &Session) -> ClientResult<Vec<User>> {
        self.get(session, User::LIST_PATH).await
    }

    /// Exchange credentials for a token pair
    pub async fn obtain_token(&self, credentials: &Credentials) -> ClientResult<TokenPair> {
        self.post_public(User::TOKEN_PATH, credentials).await
    }

    /// Create an account
    pub async fn register(&self, payload: &RegisterPayload) -> ClientResult<serde_json::Value> {
        self.post_public(User::REGISTER_PATH, payload).await
    }
}
