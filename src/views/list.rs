use std::marker::PhantomData;

use super::{delete_confirmed, Confirm, Mutation, ViewState};
use crate::context::AppContext;
use crate::model::Resource;

/// One collection, e.g. all leases
pub struct ListView<R: Resource> {
    ctx: AppContext,
    state: ViewState<Vec<R>>,
    _resource: PhantomData<R>,
}

impl<R: Resource> ListView<R> {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ViewState::loading(),
            _resource: PhantomData,
        }
    }

    pub fn state(&self) -> &ViewState<Vec<R>> {
        &self.state
    }

    pub async fn load(&mut self) -> &ViewState<Vec<R>> {
        let result = self.ctx.client.list::<R>(&self.ctx.session).await;
        self.state.settle(result, &format!("Failed to load {} list.", R::NOUN));
        &self.state
    }

    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> Mutation {
        delete_confirmed::<R, _>(&self.ctx, &mut self.state, id, confirm, |items| {
            items.retain(|item| item.id() != id)
        })
        .await
    }
}
