//! Backend collaborators as traits, with the HTTP implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use neraca_core::ledger::{LedgerEntry, LedgerEntryInput, PostingStatus};
use neraca_core::posting::{DateFormat, NeracaBalanceCalculation, PostingCommand};
use neraca_shared::types::{PageRequest, PageResponse};

use crate::error::ClientError;
use crate::http::ApiClient;

/// Backend acknowledgement of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteAck {
    /// Backend message, if any.
    pub message: Option<String>,
}

/// Result of `POST /ledgers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedBatch {
    /// Entries the backend created, when it returns them.
    pub created: Vec<LedgerEntry>,
    /// Backend message, if any.
    pub message: Option<String>,
}

/// Filters for `GET /ledgers`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    /// Only entries on this ledger date.
    pub ledger_date: Option<NaiveDate>,
    /// Only entries with this posting status.
    pub posting_status: Option<PostingStatus>,
    /// Page to fetch.
    pub page: PageRequest,
}

impl LedgerQuery {
    /// Query string pairs in backend naming.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(date) = self.ledger_date {
            pairs.push(("ledgerDate", DateFormat::Iso.format(date)));
        }
        if let Some(status) = self.posting_status {
            pairs.push(("postingStatus", status.as_str().to_string()));
        }
        pairs.push(("page", self.page.page.to_string()));
        pairs.push(("limit", self.page.per_page.to_string()));
        pairs
    }
}

/// Ledger endpoints.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Creates a validated batch of entries.
    async fn submit_batch(&self, entries: &[LedgerEntryInput]) -> Result<SubmittedBatch, ClientError>;

    /// Lists entries.
    async fn list_ledgers(&self, query: &LedgerQuery) -> Result<PageResponse<LedgerEntry>, ClientError>;
}

/// Posting endpoints.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait PostingGateway: Send + Sync {
    /// Sends one posting or unposting request.
    async fn dispatch(&self, command: &PostingCommand, idempotency_key: Uuid) -> Result<RemoteAck, ClientError>;

    /// Fetches the Neraca Balance calculation for `date`.
    ///
    /// `Ok(None)` means the backend had nothing to calculate.
    async fn calculate_neraca_balance(
        &self,
        date: NaiveDate,
    ) -> Result<Option<NeracaBalanceCalculation>, ClientError>;
}

/// Both gateways over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: ApiClient,
}

impl HttpGateway {
    /// Wraps an API client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl LedgerGateway for HttpGateway {
    async fn submit_batch(&self, entries: &[LedgerEntryInput]) -> Result<SubmittedBatch, ClientError> {
        let envelope = self.client.post::<_, Value>("/ledgers", entries, None).await?;
        let message = envelope.message().map(str::to_string);

        // The batch is already stored; an unexpected payload must not look like a failure
        let created = match envelope.data {
            Some(data) => serde_json::from_value(data).unwrap_or_else(|err| {
                warn!(error = %err, "Unrecognised ledger creation payload");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(SubmittedBatch { created, message })
    }

    async fn list_ledgers(&self, query: &LedgerQuery) -> Result<PageResponse<LedgerEntry>, ClientError> {
        let envelope = self
            .client
            .get::<Vec<LedgerEntry>>("/ledgers", &query.to_pairs())
            .await?;
        let data = envelope.data.unwrap_or_default();
        Ok(match envelope.meta {
            Some(meta) => PageResponse { data, meta },
            None => PageResponse::single_page(data),
        })
    }
}

#[async_trait]
impl PostingGateway for HttpGateway {
    async fn dispatch(&self, command: &PostingCommand, idempotency_key: Uuid) -> Result<RemoteAck, ClientError> {
        let envelope = self
            .client
            .post::<_, Value>(command.path(), &command.body(), Some(idempotency_key))
            .await?;
        Ok(RemoteAck {
            message: envelope.message().map(str::to_string),
        })
    }

    async fn calculate_neraca_balance(
        &self,
        date: NaiveDate,
    ) -> Result<Option<NeracaBalanceCalculation>, ClientError> {
        let query = [("date", DateFormat::DayMonthYear.format(date))];
        let envelope = self
            .client
            .get::<NeracaBalanceCalculation>("/posting/neraca-balance/calculate", &query)
            .await?;
        Ok(envelope.data)
    }
}
