//! RentWise REST API Client
//!
//! HTTP client for the RentWise API. Every authenticated call carries
//! `Authorization: Bearer <token>` from an explicit [`Session`]; a JSON
//! content type is sent only when there is a body. One attempt per call:
//! no retries, no timeout, no backoff.

mod error;
mod resources;

pub use error::{ClientError, ClientResult, FALLBACK_MESSAGE};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::session::Session;

/// Header carrying the per-request id
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// RentWise REST API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API at `base_url` (e.g. "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("rentwise/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document
    pub async fn get<T: DeserializeOwned>(&self, session: &Session, path: &str) -> ClientResult<T> {
        let response = self.execute::<()>(Some(session), Method::GET, path, None).await?;
        decode(path, response).await
    }

    /// POST a JSON body and parse the JSON reply
    pub async fn post<B, T>(&self, session: &Session, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Some(session), Method::POST, path, Some(body)).await?;
        decode(path, response).await
    }

    /// PUT a JSON body and parse the JSON reply
    pub async fn put<B, T>(&self, session: &Session, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(Some(session), Method::PUT, path, Some(body)).await?;
        decode(path, response).await
    }

    /// DELETE a resource; any success status counts
    pub async fn delete(&self, session: &Session, path: &str) -> ClientResult<()> {
        self.execute::<()>(Some(session), Method::DELETE, path, None).await?;
        Ok(())
    }

    /// GET a binary body
    pub async fn get_bytes(&self, session: &Session, path: &str) -> ClientResult<Vec<u8>> {
        let response = self.execute::<()>(Some(session), Method::GET, path, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// POST a JSON body without credentials (login, registration)
    pub async fn post_public<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(None, Method::POST, path, Some(body)).await?;
        decode(path, response).await
    }

    /// Send one request and turn non-success statuses into errors
    async fn execute<B: Serialize + ?Sized>(
        &self,
        session: Option<&Session>,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(session) = session {
            request = request.header(AUTHORIZATION, session.bearer());
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").json(body);
        }

        tracing::debug!(request_id = %request_id, method = %method, path = %path, "Sending request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(request_id = %request_id, path = %path, error = %e, "Request failed");
            ClientError::Network(e)
        })?;

        let status = response.status();
        tracing::debug!(request_id = %request_id, status = status.as_u16(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(request_id = %request_id, error = %e, "Failed to read error body");
                Default::default()
            }
        };
        let error = ClientError::from_status(status.as_u16(), &body);
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            error = %error,
            "API error"
        );
        Err(error)
    }
}

/// Parse a successful response body into `T`
async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
        path: path.to_string(),
        error: e.to_string(),
    })
}
