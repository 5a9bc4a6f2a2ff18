//! Posting controller: role checks, busy guards, ordering policy, dispatch
//! and invalidation for the four closing stages.

use chrono::NaiveDate;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use neraca_core::posting::{
    NeracaBalanceForm, PeriodState, PostingAction, PostingCommand, PostingError, PostingService,
    PostingStage,
};
use neraca_shared::config::PostingConfig;
use neraca_shared::types::Money;
use neraca_shared::AppResult;

use crate::gateway::PostingGateway;
use crate::inflight::InFlight;
use crate::invalidation::{CacheTag, Invalidator};
use crate::session::Session;

/// What to do when a request breaks the stage order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Refuse locally; no request is sent.
    Enforce,
    /// Log a warning and send anyway; the backend decides.
    #[default]
    Advisory,
}

impl From<&PostingConfig> for OrderingPolicy {
    fn from(config: &PostingConfig) -> Self {
        if config.enforce_stage_order {
            Self::Enforce
        } else {
            Self::Advisory
        }
    }
}

/// A confirmed posting action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingOutcome {
    /// Stage acted upon.
    pub stage: PostingStage,
    /// Post or unpost.
    pub action: PostingAction,
    /// Date the action applied to.
    pub date: NaiveDate,
    /// Backend message, or the stage's success message.
    pub message: String,
    /// Period state after the action.
    pub state: PeriodState,
}

/// Runs posting actions against a `PostingGateway`.
pub struct PostingController<G> {
    gateway: G,
    session: Arc<Session>,
    invalidator: Invalidator,
    policy: OrderingPolicy,
    in_flight: InFlight<PostingStage>,
    periods: DashMap<NaiveDate, PeriodState>,
}

impl<G: PostingGateway> PostingController<G> {
    /// Creates a controller.
    pub fn new(
        gateway: G,
        session: Arc<Session>,
        invalidator: Invalidator,
        policy: OrderingPolicy,
    ) -> Self {
        Self {
            gateway,
            session,
            invalidator,
            policy,
            in_flight: InFlight::new(),
            periods: DashMap::new(),
        }
    }

    /// The ordering policy in effect.
    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    /// Last known state for `date`; `NotStarted` if nothing was recorded.
    pub fn period_state(&self, date: NaiveDate) -> PeriodState {
        self.periods
            .get(&date)
            .map(|state| *state)
            .unwrap_or_default()
    }

    /// Seeds the known state for `date`, e.g. from the posting dashboard.
    pub fn record_state(&self, date: NaiveDate, state: PeriodState) {
        self.periods.insert(date, state);
    }

    /// Returns true if a request for `stage` is in flight.
    pub fn is_busy(&self, stage: PostingStage) -> bool {
        self.in_flight.is_busy(&stage)
    }

    /// Posts Buku Besar for a ledger date.
    pub async fn post_buku_besar(&self, ledger_date: NaiveDate) -> AppResult<PostingOutcome> {
        self.execute(PostingCommand::PostBukuBesar { ledger_date })
            .await
    }

    /// Unposts Buku Besar for a ledger date.
    pub async fn unpost_buku_besar(&self, ledger_date: NaiveDate) -> AppResult<PostingOutcome> {
        self.execute(PostingCommand::UnpostBukuBesar { ledger_date })
            .await
    }

    /// Posts Neraca Detail.
    pub async fn post_neraca_detail(&self, date: NaiveDate) -> AppResult<PostingOutcome> {
        self.execute(PostingCommand::PostNeracaDetail { date }).await
    }

    /// Unposts Neraca Detail.
    pub async fn unpost_neraca_detail(&self, date: NaiveDate) -> AppResult<PostingOutcome> {
        self.execute(PostingCommand::UnpostNeracaDetail { date })
            .await
    }

    /// Fetches the Neraca Balance calculation for the form's date and
    /// attaches it, returning the pre-filled Sisa Hasil Usaha amount.
    pub async fn calculate_neraca_balance(&self, form: &mut NeracaBalanceForm) -> AppResult<Money> {
        self.session
            .require(PostingStage::NeracaBalance.required_capability(PostingAction::Post))?;
        let date = form.date().ok_or(PostingError::MissingDate)?;

        let calculation = self
            .gateway
            .calculate_neraca_balance(date)
            .await
            .map_err(|err| err.into_app_error("Failed to calculate Neraca Balance"))?
            .ok_or(PostingError::CalculationUnavailable)?;
        let amount = calculation.sisa_hasil_usaha()?;

        if calculation.has_existing_record() {
            warn!(%date, "A Neraca Balance is already saved for this date");
        }
        info!(%date, sisa_hasil_usaha = %amount, "Neraca Balance calculated");
        form.attach(calculation);
        Ok(amount)
    }

    /// Posts Neraca Balance from a form whose calculation has been fetched.
    ///
    /// Without a calculation no request is sent.
    pub async fn post_neraca_balance(&self, form: &NeracaBalanceForm) -> AppResult<PostingOutcome> {
        let command = form.command()?;
        self.execute(command).await
    }

    /// Posts Neraca Akhir, closing the period.
    pub async fn post_neraca_akhir(&self, date: NaiveDate) -> AppResult<PostingOutcome> {
        self.execute(PostingCommand::PostNeracaAkhir { date }).await
    }

    /// Runs any posting command.
    pub async fn execute(&self, command: PostingCommand) -> AppResult<PostingOutcome> {
        let stage = command.stage();
        let action = command.action();
        let date = command.date();

        self.session.require(stage.required_capability(action))?;
        let _guard = self
            .in_flight
            .try_acquire(stage)
            .ok_or(PostingError::StageBusy { stage })?;

        let current = self.period_state(date);
        if let Err(err) = PostingService::transition(current, stage, action) {
            match self.policy {
                OrderingPolicy::Enforce => return Err(err.into()),
                OrderingPolicy::Advisory => warn!(
                    %stage,
                    %action,
                    %date,
                    state = %current,
                    code = err.error_code(),
                    "{err}; sending anyway"
                ),
            }
        }
        let next = match action {
            PostingAction::Post => PeriodState::with_highest(Some(stage)),
            PostingAction::Unpost => PeriodState::with_highest(stage.prerequisite()),
        };

        let idempotency_key = Uuid::new_v4();
        info!(%stage, %action, %date, %idempotency_key, "Dispatching posting request");

        match self.gateway.dispatch(&command, idempotency_key).await {
            Ok(ack) => {
                let next = *self
                    .periods
                    .entry(date)
                    .and_modify(|stored| *stored = settle(*stored, current, next, stage, action))
                    .or_insert(next);
                self.invalidator.invalidate(CacheTag::affected_by(stage));
                let message = ack
                    .message
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| stage.success_message(action));
                info!(%stage, %action, %date, state = %next, "{message}");
                Ok(PostingOutcome {
                    stage,
                    action,
                    date,
                    message,
                    state: next,
                })
            }
            Err(err) => {
                warn!(%stage, %action, %date, code = err.error_code(), error = %err, "Posting request failed");
                Err(err.into_app_error(&stage.failure_message(action)))
            }
        }
    }
}

/// State to record once the backend confirmed `action` on `stage`.
///
/// `current` is what was read before dispatch. When another action for the
/// same date landed in between, the confirmed action is replayed on the
/// stored state, and dropped if that state already covers it.
fn settle(
    stored: PeriodState,
    current: PeriodState,
    next: PeriodState,
    stage: PostingStage,
    action: PostingAction,
) -> PeriodState {
    if stored == current {
        return next;
    }
    PostingService::transition(stored, stage, action).map_or(stored, |transition| transition.to)
}
