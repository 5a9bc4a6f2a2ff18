//! REST client for the Neraca accounting backend.
//!
//! # Modules
//!
//! - `http` - Transport with bearer auth, envelope decoding, and retries
//! - `gateway` - Backend endpoints as mockable traits
//! - `ledger` - Ledger batch submission and listings
//! - `posting` - The four posting stages with ordering and busy guards
//! - `session` - The signed-in operator
//! - `invalidation` - Cache invalidation after mutations

pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http;
pub mod inflight;
pub mod invalidation;
pub mod ledger;
pub mod posting;
pub mod retry;
pub mod session;

pub use error::ClientError;
pub use gateway::{HttpGateway, LedgerGateway, LedgerQuery, PostingGateway};
pub use http::ApiClient;
pub use invalidation::{CacheTag, Invalidator};
pub use ledger::{LedgerController, SubmitOutcome};
pub use posting::{OrderingPolicy, PostingController, PostingOutcome};
pub use retry::{RequestKind, RetryConfig};
pub use session::Session;
