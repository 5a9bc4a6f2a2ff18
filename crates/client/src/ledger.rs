//! Ledger batch submission and listing.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use neraca_core::auth::Capability;
use neraca_core::ledger::{LedgerBatch, LedgerEntry, PostingSummary};
use neraca_shared::types::{PageRequest, PageResponse};
use neraca_shared::{AppError, AppResult};

use crate::gateway::{LedgerGateway, LedgerQuery};
use crate::inflight::InFlight;
use crate::invalidation::{CacheTag, Invalidator};
use crate::session::Session;

const SUBMIT_SUCCESS: &str = "Ledger entries saved successfully";
const SUBMIT_FAILURE: &str = "Failed to save ledger entries";
const LIST_FAILURE: &str = "Failed to load ledger entries";

const SUMMARY_PAGE_SIZE: u32 = 100;
const SUMMARY_MAX_PAGES: u32 = 1_000;

/// A saved batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    /// Number of entries sent.
    pub submitted: usize,
    /// Entries the backend returned, possibly empty.
    pub created: Vec<LedgerEntry>,
    /// Backend message, or a default success message.
    pub message: String,
}

/// Runs ledger operations against a `LedgerGateway`.
pub struct LedgerController<G> {
    gateway: G,
    session: Arc<Session>,
    invalidator: Invalidator,
    submitting: InFlight<()>,
}

impl<G: LedgerGateway> LedgerController<G> {
    /// Creates a controller.
    pub fn new(gateway: G, session: Arc<Session>, invalidator: Invalidator) -> Self {
        Self {
            gateway,
            session,
            invalidator,
            submitting: InFlight::new(),
        }
    }

    /// Returns true while a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy(&())
    }

    /// Validates and submits `batch`.
    ///
    /// Nothing is sent unless the whole batch validates. On success the
    /// batch is cleared; on failure it is left untouched for correction.
    ///
    /// # Errors
    ///
    /// * `AppError::Validation` / `AppError::Unbalanced` from local checks
    /// * `AppError::PrerequisiteNotMet` if a submission is already running
    /// * the backend error, with its message verbatim
    pub async fn submit(&self, batch: &mut LedgerBatch) -> AppResult<SubmitOutcome> {
        self.session.require(Capability::CreateLedger)?;
        let entries = batch.validate()?;

        let _guard = self.submitting.try_acquire(()).ok_or_else(|| {
            AppError::PrerequisiteNotMet("A ledger batch is already being submitted".into())
        })?;

        let summary = batch.summary();
        info!(
            entries = entries.len(),
            total_debit = %summary.total_debit,
            "Submitting ledger batch"
        );

        match self.gateway.submit_batch(&entries).await {
            Ok(submitted) => {
                batch.clear();
                self.invalidator.invalidate(CacheTag::LEDGER_SUBMISSION);
                let message = submitted
                    .message
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| SUBMIT_SUCCESS.to_string());
                info!(entries = entries.len(), "{message}");
                Ok(SubmitOutcome {
                    submitted: entries.len(),
                    created: submitted.created,
                    message,
                })
            }
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "Ledger submission failed");
                Err(err.into_app_error(SUBMIT_FAILURE))
            }
        }
    }

    /// Lists ledger entries.
    pub async fn list(&self, query: &LedgerQuery) -> AppResult<PageResponse<LedgerEntry>> {
        self.session.require(Capability::ViewLedger)?;
        self.gateway
            .list_ledgers(query)
            .await
            .map_err(|err| err.into_app_error(LIST_FAILURE))
    }

    /// Pending and posted totals, read across every page of the listing.
    pub async fn posting_summary(&self, ledger_date: Option<NaiveDate>) -> AppResult<PostingSummary> {
        let mut entries = Vec::new();
        let mut page = 1;
        loop {
            let query = LedgerQuery {
                ledger_date,
                posting_status: None,
                page: PageRequest::new(page, SUMMARY_PAGE_SIZE),
            };
            let response = self.list(&query).await?;
            let more = response.has_next() && !response.data.is_empty();
            entries.extend(response.data);
            if !more {
                break;
            }
            if page >= SUMMARY_MAX_PAGES {
                warn!(page, "Stopped paging ledger entries");
                break;
            }
            page += 1;
        }
        Ok(PostingSummary::from_entries(&entries, ledger_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::gateway::{MockLedgerGateway, SubmittedBatch};
    use neraca_core::auth::UserRole;
    use neraca_core::ledger::{EntryType, LedgerLineDraft, PostingStatus};
    use neraca_shared::types::{AccountDetailId, AccountGeneralId, LedgerEntryId, Money};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
    }

    fn draft(entry_type: EntryType, minor: i64) -> LedgerLineDraft {
        LedgerLineDraft {
            ledger_date: Some(date()),
            description: "Setoran simpanan pokok".into(),
            ledger_type: "Kas".into(),
            account_general_id: Some(AccountGeneralId::new()),
            account_detail_id: Some(AccountDetailId::new()),
            ..LedgerLineDraft::new().with_amount(entry_type, Money::from_minor(minor))
        }
    }

    fn balanced_batch() -> LedgerBatch {
        LedgerBatch::from_lines(vec![
            draft(EntryType::Debit, 10_000_000),
            draft(EntryType::Credit, 10_000_000),
        ])
    }

    fn entry(status: PostingStatus, entry_type: EntryType, minor: i64) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::new(),
            ledger_date: date(),
            description: "Setoran".into(),
            ledger_type: None,
            transaction_type: entry_type,
            account_detail_id: AccountDetailId::new(),
            account_general_id: AccountGeneralId::new(),
            amount: Money::from_minor(minor),
            reference_number: None,
            posting_status: status,
            posting_at: None,
        }
    }

    fn controller(gateway: MockLedgerGateway, role: UserRole) -> LedgerController<MockLedgerGateway> {
        LedgerController::new(
            gateway,
            Arc::new(Session::signed_in("token", role)),
            Invalidator::default(),
        )
    }

    #[tokio::test]
    async fn test_submit_clears_batch_and_invalidates() {
        let mut gateway = MockLedgerGateway::new();
        gateway
            .expect_submit_batch()
            .withf(|entries| entries.len() == 2)
            .times(1)
            .returning(|_| Ok(SubmittedBatch::default()));
        let controller = controller(gateway, UserRole::Staff);
        let mut receiver = controller.invalidator.subscribe();

        let mut batch = balanced_batch();
        let outcome = controller.submit(&mut batch).await.unwrap();

        assert_eq!(outcome.submitted, 2);
        assert_eq!(outcome.message, "Ledger entries saved successfully");
        assert!(batch.is_empty());
        assert_eq!(receiver.try_recv().unwrap(), CacheTag::Ledgers);
        assert_eq!(receiver.try_recv().unwrap(), CacheTag::PostingDashboard);
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_unbalanced_batch_never_sent() {
        let mut gateway = MockLedgerGateway::new();
        gateway.expect_submit_batch().never();
        let controller = controller(gateway, UserRole::Admin);

        let mut batch = LedgerBatch::from_lines(vec![
            draft(EntryType::Debit, 10_000_000),
            draft(EntryType::Credit, 9_000_000),
        ]);
        let err = controller.submit(&mut batch).await.unwrap_err();

        assert!(matches!(err, AppError::Unbalanced(_)));
        assert_eq!(batch.len(), 2);
    }

    #[tokio::test]
    async fn test_single_line_rejected_locally() {
        let mut gateway = MockLedgerGateway::new();
        gateway.expect_submit_batch().never();
        let controller = controller(gateway, UserRole::Admin);

        let mut batch = LedgerBatch::from_lines(vec![draft(EntryType::Debit, 100)]);
        let err = controller.submit(&mut batch).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_viewer_cannot_submit() {
        let mut gateway = MockLedgerGateway::new();
        gateway.expect_submit_batch().never();
        let controller = controller(gateway, UserRole::Viewer);

        let err = controller.submit(&mut balanced_batch()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_batch() {
        let mut gateway = MockLedgerGateway::new();
        gateway.expect_submit_batch().returning(|_| {
            Err(ClientError::Rejected {
                status: 400,
                message: Some("Akun detail tidak ditemukan".into()),
            })
        });
        let controller = controller(gateway, UserRole::Accountant);

        let mut batch = balanced_batch();
        let err = controller.submit(&mut batch).await.unwrap_err();
        assert_eq!(err, AppError::Rejected("Akun detail tidak ditemukan".into()));
        assert_eq!(batch.len(), 2);
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_posting_summary_pages_through_listing() {
        let mut gateway = MockLedgerGateway::new();
        gateway
            .expect_list_ledgers()
            .withf(|query| query.page.page == 1)
            .times(1)
            .returning(|_| {
                Ok(PageResponse::new(
                    vec![
                        entry(PostingStatus::Pending, EntryType::Debit, 5_000),
                        entry(PostingStatus::Pending, EntryType::Credit, 5_000),
                    ],
                    1,
                    2,
                    3,
                ))
            });
        gateway
            .expect_list_ledgers()
            .withf(|query| query.page.page == 2)
            .times(1)
            .returning(|_| {
                Ok(PageResponse::new(
                    vec![entry(PostingStatus::Posted, EntryType::Debit, 7_000)],
                    2,
                    2,
                    3,
                ))
            });
        let controller = controller(gateway, UserRole::Viewer);

        let summary = controller.posting_summary(Some(date())).await.unwrap();
        assert_eq!(summary.pending_count, 2);
        assert_eq!(summary.posted_count, 1);
        assert_eq!(summary.pending_debit, Money::from_minor(5_000));
        assert_eq!(summary.posted_debit, Money::from_minor(7_000));
    }

    #[tokio::test]
    async fn test_list_requires_role() {
        let mut gateway = MockLedgerGateway::new();
        gateway.expect_list_ledgers().never();
        let controller = LedgerController::new(gateway, Arc::new(Session::new()), Invalidator::default());

        let err = controller.list(&LedgerQuery::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
