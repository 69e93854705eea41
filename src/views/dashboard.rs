use serde::Serialize;

use super::{delete_confirmed, Confirm, Mutation, ViewState};
use crate::context::AppContext;
use crate::model::{Lease, Payment, Property, Resource};

const LOAD_FAILED: &str = "Failed to load dashboard data.";

/// Everything the dashboard shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub properties: Vec<Property>,
    pub leases: Vec<Lease>,
    pub payments: Vec<Payment>,
}

/// Landing view: all of the user's records
pub struct DashboardView {
    ctx: AppContext,
    state: ViewState<Dashboard>,
}

impl DashboardView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ViewState::loading(),
        }
    }

    pub fn state(&self) -> &ViewState<Dashboard> {
        &self.state
    }

    /// Fetch the three collections together; any failure fails the view
    pub async fn load(&mut self) -> &ViewState<Dashboard> {
        let client = &self.ctx.client;
        let session = &self.ctx.session;

        let result = tokio::try_join!(
            client.list::<Property>(session),
            client.list::<Lease>(session),
            client.list::<Payment>(session),
        )
        .map(|(properties, leases, payments)| Dashboard {
            properties,
            leases,
            payments,
        });

        self.state.settle(result, LOAD_FAILED);
        &self.state
    }

    pub async fn delete_property(&mut self, id: i64, confirm: &dyn Confirm) -> Mutation {
        self.delete::<Property>(id, confirm, |d| d.properties.retain(|p| p.id != id))
            .await
    }

    pub async fn delete_lease(&mut self, id: i64, confirm: &dyn Confirm) -> Mutation {
        self.delete::<Lease>(id, confirm, |d| d.leases.retain(|l| l.id != id))
            .await
    }

    pub async fn delete_payment(&mut self, id: i64, confirm: &dyn Confirm) -> Mutation {
        self.delete::<Payment>(id, confirm, |d| d.payments.retain(|p| p.id != id))
            .await
    }

    async fn delete<R: Resource>(
        &mut self,
        id: i64,
        confirm: &dyn Confirm,
        update: impl FnOnce(&mut Dashboard),
    ) -> Mutation {
        delete_confirmed::<R, _>(&self.ctx, &mut self.state, id, confirm, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Route;
    use crate::testing::{self, fixtures};
    use crate::views::Phase;
    use axum::http::StatusCode;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use serde_json::json;

    fn healthy() -> Router {
        Router::new()
            .route(
                "/properties/api/",
                get(|| async {
                    Json(json!([
                        fixtures::property(1, "available"),
                        fixtures::property(2, "rented")
                    ]))
                }),
            )
            .route(
                "/properties/api/leases/",
                get(|| async { Json(json!([fixtures::lease(7, 2)])) }),
            )
            .route(
                "/properties/api/payments/",
                get(|| async { Json(json!([fixtures::payment(4, 7)])) }),
            )
    }

    #[tokio::test]
    async fn test_load_fans_out() {
        let api = testing::spawn(healthy()).await;
        let mut view = DashboardView::new(api.context());

        let state = view.load().await;
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.data().properties.len(), 2);
        assert_eq!(state.data().leases[0].id, 7);
        assert_eq!(state.data().payments[0].lease, Some(7));

        assert_eq!(api.recorder.count_method("GET"), 3);
        assert!(api
            .recorder
            .requests()
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer test-token")));
    }

    #[tokio::test]
    async fn test_server_error_gives_one_message_and_empty_lists() {
        let router = Router::new()
            .route(
                "/properties/api/",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route(
                "/properties/api/leases/",
                get(|| async { Json(json!([fixtures::lease(7, 2)])) }),
            )
            .route(
                "/properties/api/payments/",
                get(|| async { Json(json!([])) }),
            );
        let api = testing::spawn(router).await;
        let mut view = DashboardView::new(api.context());

        let state = view.load().await;
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error(), Some(LOAD_FAILED));
        assert!(state.data().properties.is_empty());
        // No partial rendering of the sources that succeeded
        assert!(state.data().leases.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_redirects_without_data() {
        let router = Router::new()
            .route("/properties/api/", get(|| async { StatusCode::UNAUTHORIZED }))
            .route(
                "/properties/api/leases/",
                get(|| async { Json(json!([fixtures::lease(7, 2)])) }),
            )
            .route(
                "/properties/api/payments/",
                get(|| async { Json(json!([])) }),
            );
        let api = testing::spawn(router).await;
        let mut view = DashboardView::new(api.context());

        let state = view.load().await;
        assert_eq!(state.phase(), Phase::Redirect(Route::Login));
        assert_eq!(state.error(), None);
        assert_eq!(state.data(), &Dashboard::default());
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let api = testing::spawn(healthy()).await;
        let mut view = DashboardView::new(api.context());
        view.load().await;

        let outcome = view.delete_property(1, &|_: &str| false).await;
        assert_eq!(outcome, Mutation::Cancelled);
        assert_eq!(api.recorder.count_method("DELETE"), 0);
        assert_eq!(view.state().data().properties.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_items() {
        let router = healthy().route(
            "/properties/api/:id/",
            delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let api = testing::spawn(router).await;
        let mut view = DashboardView::new(api.context());
        view.load().await;

        let outcome = view.delete_property(1, &|_: &str| true).await;
        assert_eq!(outcome, Mutation::Failed);
        assert_eq!(view.state().data().properties.len(), 2);
        assert_eq!(view.state().error(), Some("Failed to delete property."));
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_item() {
        let router = healthy().route(
            "/properties/api/payments/:id/",
            delete(|| async { StatusCode::NO_CONTENT }),
        );
        let api = testing::spawn(router).await;
        let mut view = DashboardView::new(api.context());
        view.load().await;

        let prompts = std::sync::Mutex::new(Vec::new());
        let confirm = |prompt: &str| {
            prompts.lock().unwrap().push(prompt.to_string());
            true
        };
        let outcome = view.delete_payment(4, &confirm).await;

        assert_eq!(outcome, Mutation::Applied);
        assert!(view.state().data().payments.is_empty());
        assert_eq!(view.state().phase(), Phase::Ready);
        assert_eq!(
            prompts.lock().unwrap().as_slice(),
            ["Are you sure you want to delete this payment?"]
        );
    }

    #[tokio::test]
    async fn test_delete_before_load_is_refused() {
        let api = testing::spawn(healthy()).await;
        let mut view = DashboardView::new(api.context());

        let outcome = view.delete_lease(7, &|_: &str| true).await;
        assert_eq!(outcome, Mutation::NotReady);
        assert_eq!(api.recorder.count(), 0);
    }
}
