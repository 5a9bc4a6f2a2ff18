//! HTTP transport for the backend REST API.

use std::sync::Arc;

use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use neraca_shared::config::ApiConfig;

use crate::envelope::{ApiEnvelope, ErrorBody};
use crate::error::ClientError;
use crate::retry::{RequestKind, RetryConfig, retry_request};
use crate::session::Session;

/// Header carrying the per-action idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Thin client over `reqwest` that adds the bearer token, decodes the
/// response envelope and applies the retry policy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
    retry: RetryConfig,
}

struct Outgoing<'a> {
    method: Method,
    path: &'a str,
    query: &'a [(&'a str, String)],
    body: Option<serde_json::Value>,
    idempotency_key: Option<Uuid>,
}

impl ApiClient {
    /// Creates a client with the configured timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            retry: RetryConfig::from_api(config),
        })
    }

    /// Overrides the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The session whose token is sent with every request.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a GET. Retried on connectivity failures and 5xx.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>, ClientError> {
        self.execute(
            RequestKind::Read,
            Outgoing {
                method: Method::GET,
                path,
                query,
                body: None,
                idempotency_key: None,
            },
        )
        .await
    }

    /// Sends a POST. Retried only if the connection was never established.
    ///
    /// The idempotency key, when given, is the same on every attempt.
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: Option<Uuid>,
    ) -> Result<ApiEnvelope<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|err| ClientError::Decode(err.to_string()))?;
        self.execute(
            RequestKind::Write,
            Outgoing {
                method: Method::POST,
                path,
                query: &[],
                body: Some(body),
                idempotency_key,
            },
        )
        .await
    }

    /// Ends the backend session and always clears the local one.
    pub async fn logout(&self) {
        if self.session.is_authenticated() {
            let result: Result<ApiEnvelope<serde_json::Value>, _> =
                self.post("/auth/logout", &serde_json::json!({}), None).await;
            if let Err(err) = result {
                warn!(error = %err, "Logout request failed; clearing local session anyway");
            }
        }
        self.session.clear();
        info!("Signed out");
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        kind: RequestKind,
        outgoing: Outgoing<'_>,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let operation = format!("{} {}", outgoing.method, outgoing.path);
        let this = self;
        let outgoing = &outgoing;
        retry_request(&self.retry, kind, &operation, move || async move {
            this.send_once(outgoing).await
        })
        .await
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        outgoing: &Outgoing<'_>,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let url = format!("{}{}", self.base_url, outgoing.path);
        let mut request = self.http.request(outgoing.method.clone(), &url);
        if !outgoing.query.is_empty() {
            request = request.query(outgoing.query);
        }
        if let Some(body) = &outgoing.body {
            request = request.json(body);
        }
        if let Some(key) = outgoing.idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, key.to_string());
        }
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        debug!(method = %outgoing.method, %url, "Sending request");
        let response = request.send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<ApiEnvelope<T>, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        let envelope: ApiEnvelope<T> =
            serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))?;
        if !envelope.success {
            return Err(ClientError::Unsuccessful {
                message: envelope.message,
            });
        }
        return Ok(envelope);
    }

    let message = ErrorBody::parse(&bytes);
    let code = status.as_u16();
    Err(match code {
        401 => ClientError::Unauthorized { message },
        403 => ClientError::Forbidden { message },
        500..=599 => ClientError::Server {
            status: code,
            message,
        },
        _ => ClientError::Rejected {
            status: code,
            message,
        },
    })
}
