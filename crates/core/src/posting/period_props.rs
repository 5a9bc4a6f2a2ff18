//! Property-based tests for PostingService.

use proptest::prelude::*;

use super::error::PostingError;
use super::period::PeriodState;
use super::service::PostingService;
use super::stage::{PostingAction, PostingStage};

fn arb_state() -> impl Strategy<Value = PeriodState> {
    prop_oneof![
        Just(PeriodState::NotStarted),
        Just(PeriodState::BukuBesarPosted),
        Just(PeriodState::NeracaDetailPosted),
        Just(PeriodState::NeracaBalancePosted),
        Just(PeriodState::Closed),
    ]
}

fn arb_stage() -> impl Strategy<Value = PostingStage> {
    prop_oneof![
        Just(PostingStage::BukuBesar),
        Just(PostingStage::NeracaDetail),
        Just(PostingStage::NeracaBalance),
        Just(PostingStage::NeracaAkhir),
    ]
}

fn arb_action() -> impl Strategy<Value = PostingAction> {
    prop_oneof![Just(PostingAction::Post), Just(PostingAction::Unpost)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Post succeeds exactly for the next stage.
    #[test]
    fn prop_post_only_next_stage(state in arb_state(), stage in arb_stage()) {
        let result = PostingService::post(state, stage);
        prop_assert_eq!(result.is_ok(), state.next_stage() == Some(stage));
        if let Ok(transition) = result {
            prop_assert_eq!(transition.to.highest_posted(), Some(stage));
            prop_assert_eq!(transition.from, state);
        }
    }

    /// Unpost followed by post returns to the starting state.
    #[test]
    fn prop_unpost_then_post_restores(state in arb_state(), stage in arb_stage()) {
        if let Ok(unposted) = PostingService::unpost(state, stage) {
            let reposted = PostingService::post(unposted.to, stage);
            prop_assert_eq!(reposted.map(|t| t.to), Ok(state));
        }
    }

    /// Irreversible stages never unpost, whatever the state.
    #[test]
    fn prop_irreversible_never_unpost(state in arb_state()) {
        for stage in [PostingStage::NeracaBalance, PostingStage::NeracaAkhir] {
            prop_assert_eq!(
                PostingService::unpost(state, stage),
                Err(PostingError::UnpostNotSupported { stage })
            );
        }
    }

    /// A closed period accepts nothing.
    #[test]
    fn prop_closed_is_terminal(stage in arb_stage(), action in arb_action()) {
        prop_assert!(!PostingService::is_valid_transition(PeriodState::Closed, stage, action));
    }

    /// Any accepted transition moves the state by exactly one stage.
    #[test]
    fn prop_transitions_move_one_step(state in arb_state(), stage in arb_stage(), action in arb_action()) {
        if let Ok(transition) = PostingService::transition(state, stage, action) {
            let before = state.highest_posted().map_or(0, PostingStage::order);
            let after = transition.to.highest_posted().map_or(0, PostingStage::order);
            match action {
                PostingAction::Post => prop_assert_eq!(after, before + 1),
                PostingAction::Unpost => prop_assert_eq!(after + 1, before),
            }
        }
    }
}
