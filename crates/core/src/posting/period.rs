//! Closing progress of one accounting period.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stage::PostingStage;

/// How far a period has progressed through the closing stages.
///
/// Valid transitions:
/// - `NotStarted` → `BukuBesarPosted` (post Buku Besar)
/// - `BukuBesarPosted` → `NeracaDetailPosted` (post Neraca Detail)
/// - `NeracaDetailPosted` → `NeracaBalancePosted` (post Neraca Balance)
/// - `NeracaBalancePosted` → `Closed` (post Neraca Akhir)
/// - `NeracaDetailPosted` → `BukuBesarPosted` (unpost Neraca Detail)
/// - `BukuBesarPosted` → `NotStarted` (unpost Buku Besar)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodState {
    /// Nothing posted yet.
    #[default]
    NotStarted,
    /// Buku Besar posted.
    BukuBesarPosted,
    /// Neraca Detail posted.
    NeracaDetailPosted,
    /// Neraca Balance posted.
    NeracaBalancePosted,
    /// Neraca Akhir posted; the period is final.
    Closed,
}

impl PeriodState {
    /// State after `stage` has been posted and nothing later.
    #[must_use]
    pub const fn with_highest(stage: Option<PostingStage>) -> Self {
        match stage {
            None => Self::NotStarted,
            Some(PostingStage::BukuBesar) => Self::BukuBesarPosted,
            Some(PostingStage::NeracaDetail) => Self::NeracaDetailPosted,
            Some(PostingStage::NeracaBalance) => Self::NeracaBalancePosted,
            Some(PostingStage::NeracaAkhir) => Self::Closed,
        }
    }

    /// The latest stage posted, if any.
    #[must_use]
    pub const fn highest_posted(self) -> Option<PostingStage> {
        match self {
            Self::NotStarted => None,
            Self::BukuBesarPosted => Some(PostingStage::BukuBesar),
            Self::NeracaDetailPosted => Some(PostingStage::NeracaDetail),
            Self::NeracaBalancePosted => Some(PostingStage::NeracaBalance),
            Self::Closed => Some(PostingStage::NeracaAkhir),
        }
    }

    /// The stage that may be posted next.
    #[must_use]
    pub const fn next_stage(self) -> Option<PostingStage> {
        match self.highest_posted() {
            None => Some(PostingStage::BukuBesar),
            Some(stage) => stage.next(),
        }
    }

    /// Returns true if `stage` has been posted for this period.
    #[must_use]
    pub fn is_posted(self, stage: PostingStage) -> bool {
        self.highest_posted().is_some_and(|highest| stage <= highest)
    }

    /// Returns true once Neraca Akhir has been posted.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns the snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::BukuBesarPosted => "buku_besar_posted",
            Self::NeracaDetailPosted => "neraca_detail_posted",
            Self::NeracaBalancePosted => "neraca_balance_posted",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PeriodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the snake_case name, or the name of the highest posted stage.
impl FromStr for PeriodState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "not_started" | "none" => Ok(Self::NotStarted),
            "buku_besar_posted" => Ok(Self::BukuBesarPosted),
            "neraca_detail_posted" => Ok(Self::NeracaDetailPosted),
            "neraca_balance_posted" => Ok(Self::NeracaBalancePosted),
            "closed" => Ok(Self::Closed),
            _ => s
                .parse::<PostingStage>()
                .map(|stage| Self::with_highest(Some(stage)))
                .map_err(|_| format!("Unknown period state: {s}")),
        }
    }
}
