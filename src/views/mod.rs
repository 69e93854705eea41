//! List and detail views
//!
//! Each view fetches everything it shows in parallel when loaded and
//! collapses any failure into one message. Deletes ask for confirmation
//! first and only touch local state once the server has confirmed.
//!
//! - [`DashboardView`]: properties, leases and payments
//! - [`LeaseDetailView`]: one lease with its payments and contract
//! - [`ListView`]: a single collection
//! - [`LeaseOptionsView`], [`PaymentOptionsView`]: choices for entity forms

mod dashboard;
mod lease_detail;
mod list;
mod options;
mod state;

pub use dashboard::{Dashboard, DashboardView};
pub use lease_detail::LeaseDetailView;
pub use list::ListView;
pub use options::{LeaseOptions, LeaseOptionsView, PaymentOptions, PaymentOptionsView};
pub use state::{Mutation, Phase, ViewState};

use crate::context::AppContext;
use crate::model::Resource;

/// Asks the user to approve a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirm, delete `id` on the server, then apply `update` locally
pub(crate) async fn delete_confirmed<R, T>(
    ctx: &AppContext,
    state: &mut ViewState<T>,
    id: i64,
    confirm: &dyn Confirm,
    update: impl FnOnce(&mut T),
) -> Mutation
where
    R: Resource,
    T: Default,
{
    if !state.is_ready() {
        return Mutation::NotReady;
    }
    if !confirm.confirm(&format!("Are you sure you want to delete this {}?", R::NOUN)) {
        return Mutation::Cancelled;
    }

    state.begin_mutation();
    let result = ctx.client.remove::<R>(&ctx.session, id).await;
    if result.is_ok() {
        tracing::info!(kind = R::NOUN, id, "Record deleted");
    }
    state.finish_mutation(result, &format!("Failed to delete {}.", R::NOUN), update)
}
