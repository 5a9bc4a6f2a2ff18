//! The `{success, data, message}` wrapper around every backend response.

use neraca_shared::types::PageMeta;
use serde::Deserialize;

/// Response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the backend applied the request. Assumed when omitted.
    #[serde(default = "assume_success")]
    pub success: bool,
    /// Payload.
    pub data: Option<T>,
    /// Human-readable message, shown verbatim to the operator.
    #[serde(default)]
    pub message: Option<String>,
    /// Pagination metadata on list endpoints.
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

fn assume_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// The message, if present and not blank.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Error body of a non-2xx response. Some handlers use `error` instead of `message`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn parse(bytes: &[u8]) -> Option<String> {
        let body: Self = serde_json::from_slice(bytes).ok()?;
        body.message.or(body.error)
    }
}
