//! Posting service for period-close state transitions.
//!
//! This module implements the ordering rules between the closing stages.
//! It never talks to the backend; callers decide whether a rejected
//! transition blocks the request or is only reported.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::PostingError;
use super::period::PeriodState;
use super::stage::{PostingAction, PostingStage};

/// A validated state transition with audit data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingTransition {
    /// Stage acted upon.
    pub stage: PostingStage,
    /// Post or unpost.
    pub action: PostingAction,
    /// State before the action.
    pub from: PeriodState,
    /// State once the backend confirms the action.
    pub to: PeriodState,
    /// When the transition was requested.
    pub requested_at: DateTime<Utc>,
}

/// Stateless service for period-close transitions.
///
/// All methods are associated functions that validate a transition and
/// return the resulting `PostingTransition`.
pub struct PostingService;

impl PostingService {
    /// Post `stage` for a period currently in `current`.
    ///
    /// # Returns
    /// * `Ok(PostingTransition)` if `stage` is the next stage
    /// * `Err(PostingError::PeriodClosed)` if the period is closed
    /// * `Err(PostingError::AlreadyPosted)` if `stage` is already posted
    /// * `Err(PostingError::OutOfOrder)` if an earlier stage is still pending
    pub fn post(
        current: PeriodState,
        stage: PostingStage,
    ) -> Result<PostingTransition, PostingError> {
        if current.is_closed() {
            return Err(PostingError::PeriodClosed);
        }
        if current.is_posted(stage) {
            return Err(PostingError::AlreadyPosted { stage });
        }
        match current.next_stage() {
            Some(next) if next == stage => Ok(Self::transition_to(
                current,
                stage,
                PostingAction::Post,
                PeriodState::with_highest(Some(stage)),
            )),
            Some(required) => Err(PostingError::OutOfOrder { stage, required }),
            None => Err(PostingError::PeriodClosed),
        }
    }

    /// Unpost `stage` for a period currently in `current`.
    ///
    /// # Returns
    /// * `Ok(PostingTransition)` if `stage` is the latest posted stage
    /// * `Err(PostingError::UnpostNotSupported)` for Neraca Balance and Neraca Akhir
    /// * `Err(PostingError::PeriodClosed)` if the period is closed
    /// * `Err(PostingError::NotPosted)` if `stage` is not posted
    /// * `Err(PostingError::DependentStagePosted)` if a later stage is posted
    pub fn unpost(
        current: PeriodState,
        stage: PostingStage,
    ) -> Result<PostingTransition, PostingError> {
        if !stage.supports_unpost() {
            return Err(PostingError::UnpostNotSupported { stage });
        }
        if current.is_closed() {
            return Err(PostingError::PeriodClosed);
        }
        match current.highest_posted() {
            Some(highest) if highest == stage => Ok(Self::transition_to(
                current,
                stage,
                PostingAction::Unpost,
                PeriodState::with_highest(stage.prerequisite()),
            )),
            Some(highest) if highest > stage => Err(PostingError::DependentStagePosted {
                stage,
                dependent: highest,
            }),
            _ => Err(PostingError::NotPosted { stage }),
        }
    }

    /// Dispatches to `post` or `unpost`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as `post` and `unpost`.
    pub fn transition(
        current: PeriodState,
        stage: PostingStage,
        action: PostingAction,
    ) -> Result<PostingTransition, PostingError> {
        match action {
            PostingAction::Post => Self::post(current, stage),
            PostingAction::Unpost => Self::unpost(current, stage),
        }
    }

    /// Returns true if `action` on `stage` is allowed from `current`.
    #[must_use]
    pub fn is_valid_transition(
        current: PeriodState,
        stage: PostingStage,
        action: PostingAction,
    ) -> bool {
        Self::transition(current, stage, action).is_ok()
    }

    /// Actions available from `current`, for rendering the dashboard.
    #[must_use]
    pub fn available_actions(current: PeriodState) -> Vec<(PostingStage, PostingAction)> {
        PostingStage::ALL
            .into_iter()
            .flat_map(|stage| [(stage, PostingAction::Post), (stage, PostingAction::Unpost)])
            .filter(|&(stage, action)| Self::is_valid_transition(current, stage, action))
            .collect()
    }

    fn transition_to(
        from: PeriodState,
        stage: PostingStage,
        action: PostingAction,
        to: PeriodState,
    ) -> PostingTransition {
        PostingTransition {
            stage,
            action,
            from,
            to,
            requested_at: Utc::now(),
        }
    }
}
