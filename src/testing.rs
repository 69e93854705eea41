//! Test support: an in-process stand-in for the REST API
//!
//! Every request reaching the server is recorded so tests can check
//! headers and assert that no request was made at all.

use axum::extract::Request;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::Router;
use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::context::AppContext;
use crate::session::Session;

/// What the server saw of one request
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    fn push(&self, request: &Request) {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };

        let recorded = Recorded {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            authorization: header(AUTHORIZATION.as_str()),
            content_type: header(CONTENT_TYPE.as_str()),
            request_id: header("x-request-id"),
        };
        self.0.lock().unwrap().push(recorded);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Number of requests with the given method
    pub fn count_method(&self, method: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

pub(crate) struct MockApi {
    pub base_url: String,
    pub recorder: Recorder,
}

impl MockApi {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    pub fn context(&self) -> AppContext {
        AppContext::new(self.client(), Session::new("test-token").with_username("anna"))
    }
}

/// Serve `router` on an ephemeral local port
pub(crate) async fn spawn(router: Router) -> MockApi {
    let recorder = Recorder::default();
    let layer_recorder = recorder.clone();

    let router = router
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn(move |request: Request, next: Next| {
            let recorder = layer_recorder.clone();
            async move {
                recorder.push(&request);
                next.run(request).await
            }
        }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockApi {
        base_url: format!("http://{addr}"),
        recorder,
    }
}

/// JSON bodies shaped like the server's
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn property(id: i64, status: &str) -> Value {
        json!({
            "id": id,
            "address": format!("Ogrodowa {id}, Poznań"),
            "description": "Bright, second floor",
            "property_type": "apartment",
            "status": status,
            "area": "54.50",
            "num_of_rooms": 2
        })
    }

    pub fn lease(id: i64, property: i64) -> Value {
        json!({
            "id": id,
            "property": property,
            "tenant": 5,
            "start_date": "2025-01-01",
            "end_date": "2025-12-31",
            "rate_amount": "2400.00",
            "active_lease": true
        })
    }

    /// Lease as served by the detail endpoint: property embedded, payments attached
    pub fn lease_detail(id: i64, property: i64, payments: &[i64]) -> Value {
        let mut lease = lease(id, property);
        lease["property"] = json!({"id": property, "address": format!("Ogrodowa {property}, Poznań")});
        lease["payments"] = payments.iter().map(|&p| payment(p, id)).collect();
        lease
    }

    pub fn payment(id: i64, lease: i64) -> Value {
        json!({
            "id": id,
            "lease": lease,
            "amount": "2400.00",
            "payment_date": "2025-02-01",
            "is_paid": false
        })
    }

    pub fn user(id: i64, username: &str) -> Value {
        json!({
            "id": id,
            "username": username,
            "email": format!("{username}@example.com"),
            "first_name": "",
            "last_name": "",
            "phone_number": null
        })
    }
}
