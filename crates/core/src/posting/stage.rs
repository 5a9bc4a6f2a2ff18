//! The four period-close posting stages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::dates::DateFormat;
use crate::auth::Capability;

/// Posting stages, in the order they must be executed.
///
/// The derived ordering follows execution order:
/// Buku Besar < Neraca Detail < Neraca Balance < Neraca Akhir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostingStage {
    /// General ledger posting, keyed by ledger date.
    BukuBesar,
    /// Detailed balance sheet generation.
    NeracaDetail,
    /// Closing balance with the Sisa Hasil Usaha amount. Cannot be unposted.
    NeracaBalance,
    /// Final balance sheet; closes the period. Cannot be unposted.
    NeracaAkhir,
}

/// What to do with a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingAction {
    /// PENDING to POSTED.
    Post,
    /// POSTED back to PENDING, where permitted.
    Unpost,
}

impl PostingAction {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Unpost => "unpost",
        }
    }
}

impl fmt::Display for PostingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PostingStage {
    /// Every stage in execution order.
    pub const ALL: [Self; 4] = [
        Self::BukuBesar,
        Self::NeracaDetail,
        Self::NeracaBalance,
        Self::NeracaAkhir,
    ];

    /// 1-based position in the closing sequence.
    #[must_use]
    pub const fn order(self) -> u8 {
        match self {
            Self::BukuBesar => 1,
            Self::NeracaDetail => 2,
            Self::NeracaBalance => 3,
            Self::NeracaAkhir => 4,
        }
    }

    /// Returns true if the stage can be unposted.
    #[must_use]
    pub const fn supports_unpost(self) -> bool {
        matches!(self, Self::BukuBesar | Self::NeracaDetail)
    }

    /// Returns true if `action` exists for this stage.
    #[must_use]
    pub const fn supports(self, action: PostingAction) -> bool {
        match action {
            PostingAction::Post => true,
            PostingAction::Unpost => self.supports_unpost(),
        }
    }

    /// Returns true for the stage that closes the accounting period.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::NeracaAkhir)
    }

    /// The stage that must be posted before this one.
    #[must_use]
    pub const fn prerequisite(self) -> Option<Self> {
        match self {
            Self::BukuBesar => None,
            Self::NeracaDetail => Some(Self::BukuBesar),
            Self::NeracaBalance => Some(Self::NeracaDetail),
            Self::NeracaAkhir => Some(Self::NeracaBalance),
        }
    }

    /// The stage that follows this one.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::BukuBesar => Some(Self::NeracaDetail),
            Self::NeracaDetail => Some(Self::NeracaBalance),
            Self::NeracaBalance => Some(Self::NeracaAkhir),
            Self::NeracaAkhir => None,
        }
    }

    /// Date format the backend expects for this stage.
    #[must_use]
    pub const fn date_format(self) -> DateFormat {
        match self {
            Self::BukuBesar => DateFormat::Iso,
            Self::NeracaDetail | Self::NeracaBalance | Self::NeracaAkhir => {
                DateFormat::DayMonthYear
            }
        }
    }

    /// Capability a role needs to run `action` on this stage.
    #[must_use]
    pub const fn required_capability(self, action: PostingAction) -> Capability {
        match (self, action) {
            (Self::BukuBesar, PostingAction::Post) => Capability::PostBukuBesar,
            (Self::BukuBesar, PostingAction::Unpost) => Capability::UnpostBukuBesar,
            (Self::NeracaDetail, PostingAction::Post) => Capability::PostNeracaDetail,
            (Self::NeracaDetail, PostingAction::Unpost) => Capability::UnpostNeracaDetail,
            (Self::NeracaBalance, _) => Capability::PostNeracaBalance,
            (Self::NeracaAkhir, _) => Capability::CloseNeracaAkhir,
        }
    }

    /// Persistent warning shown before an irreversible post.
    #[must_use]
    pub const fn warning(self) -> Option<&'static str> {
        match self {
            Self::BukuBesar | Self::NeracaDetail => None,
            Self::NeracaBalance => {
                Some("Posting Neraca Balance cannot be undone. Check the Sisa Hasil Usaha amount first.")
            }
            Self::NeracaAkhir => Some(
                "Posting Neraca Akhir closes the accounting period. This action cannot be undone.",
            ),
        }
    }

    /// Message shown when the backend reports success without a message.
    #[must_use]
    pub fn success_message(self, action: PostingAction) -> String {
        match action {
            PostingAction::Post => format!("{self} posted successfully"),
            PostingAction::Unpost => format!("{self} unposted successfully"),
        }
    }

    /// Message shown when the backend reports failure without a message.
    #[must_use]
    pub fn failure_message(self, action: PostingAction) -> String {
        format!("Failed to {action} {self}")
    }

    /// Kebab-case identifier used on the command line and in URLs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::BukuBesar => "buku-besar",
            Self::NeracaDetail => "neraca-detail",
            Self::NeracaBalance => "neraca-balance",
            Self::NeracaAkhir => "neraca-akhir",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BukuBesar => "Buku Besar",
            Self::NeracaDetail => "Neraca Detail",
            Self::NeracaBalance => "Neraca Balance",
            Self::NeracaAkhir => "Neraca Akhir",
        }
    }
}

impl fmt::Display for PostingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PostingStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|stage| stage.slug() == normalized)
            .ok_or_else(|| format!("Unknown posting stage: {s}"))
    }
}
