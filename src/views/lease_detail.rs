use super::{Confirm, Mutation, ViewState};
use crate::client::ClientError;
use crate::context::AppContext;
use crate::model::{LeaseDetail, Payment, Resource};

const CONTRACT_FAILED: &str = "Failed to load contract PDF preview.";

/// A lease with its payments and contract
pub struct LeaseDetailView {
    ctx: AppContext,
    id: i64,
    state: ViewState<Option<LeaseDetail>>,
}

impl LeaseDetailView {
    pub fn new(ctx: AppContext, id: i64) -> Self {
        Self {
            ctx,
            id,
            state: ViewState::loading(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn state(&self) -> &ViewState<Option<LeaseDetail>> {
        &self.state
    }

    pub async fn load(&mut self) -> &ViewState<Option<LeaseDetail>> {
        let result = self
            .ctx
            .client
            .lease_detail(&self.ctx.session, self.id)
            .await
            .map(Some);
        self.state.settle(result, "Failed to load lease data.");
        &self.state
    }

    /// Contract PDF bytes; a failure becomes the view's banner
    pub async fn contract_pdf(&mut self) -> Result<Vec<u8>, ClientError> {
        let result = self.ctx.client.lease_contract(&self.ctx.session, self.id).await;
        self.state.observe(result, CONTRACT_FAILED)
    }

    pub async fn delete_payment(&mut self, id: i64, confirm: &dyn Confirm) -> Mutation {
        super::delete_confirmed::<Payment, _>(&self.ctx, &mut self.state, id, confirm, |detail| {
            if let Some(detail) = detail {
                detail.payments.retain(|p| p.id() != id);
            }
        })
        .await
    }
}
