//! Choices offered by the lease and payment forms

use serde::Serialize;

use super::ViewState;
use crate::context::AppContext;
use crate::model::{Lease, Property, PropertyStatus, User};

const LOAD_FAILED: &str = "Failed to load form options.";

/// Properties that can be leased and the users that can rent them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeaseOptions {
    pub properties: Vec<Property>,
    pub tenants: Vec<User>,
}

pub struct LeaseOptionsView {
    ctx: AppContext,
    state: ViewState<LeaseOptions>,
}

impl LeaseOptionsView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ViewState::loading(),
        }
    }

    pub fn state(&self) -> &ViewState<LeaseOptions> {
        &self.state
    }

    /// Fetch properties and tenants together; only available properties are kept
    pub async fn load(&mut self) -> &ViewState<LeaseOptions> {
        let client = &self.ctx.client;
        let session = &self.ctx.session;

        let result = tokio::try_join!(client.list::<Property>(session), client.list_users(session))
            .map(|(properties, tenants)| LeaseOptions {
                properties: properties
                    .into_iter()
                    .filter(|p| p.status == PropertyStatus::Available)
                    .collect(),
                tenants,
            });

        self.state.settle(result, LOAD_FAILED);
        &self.state
    }
}

/// Leases a payment can be booked against
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentOptions {
    pub leases: Vec<Lease>,
}

pub struct PaymentOptionsView {
    ctx: AppContext,
    state: ViewState<PaymentOptions>,
}

impl PaymentOptionsView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ViewState::loading(),
        }
    }

    pub fn state(&self) -> &ViewState<PaymentOptions> {
        &self.state
    }

    pub async fn load(&mut self) -> &ViewState<PaymentOptions> {
        let result = self
            .ctx
            .client
            .list::<Lease>(&self.ctx.session)
            .await
            .map(|leases| PaymentOptions { leases });
        self.state.settle(result, LOAD_FAILED);
        &self.state
    }
}
