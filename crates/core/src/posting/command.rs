//! Posting requests ready to send to the backend.

use chrono::NaiveDate;
use neraca_shared::types::{Money, money};
use serde::Serialize;

use super::error::PostingError;
use super::stage::{PostingAction, PostingStage};

/// One posting or unposting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingCommand {
    /// Post all pending entries of a ledger date to Buku Besar.
    PostBukuBesar {
        /// Ledger date.
        ledger_date: NaiveDate,
    },
    /// Return a ledger date's entries to pending.
    UnpostBukuBesar {
        /// Ledger date.
        ledger_date: NaiveDate,
    },
    /// Generate the detailed balance sheet.
    PostNeracaDetail {
        /// Period date.
        date: NaiveDate,
    },
    /// Revert the detailed balance sheet.
    UnpostNeracaDetail {
        /// Period date.
        date: NaiveDate,
    },
    /// Post the closing balance with its Sisa Hasil Usaha amount.
    PostNeracaBalance {
        /// Period-end date.
        date: NaiveDate,
        /// Amount taken from the backend calculation.
        sisa_hasil_usaha_amount: Money,
    },
    /// Finalize the period.
    PostNeracaAkhir {
        /// Period-end date.
        date: NaiveDate,
    },
}

/// JSON body of a posting request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostingBody {
    /// `{ledgerDate: "YYYY-MM-DD"}`.
    Ledger {
        /// ISO ledger date.
        #[serde(rename = "ledgerDate")]
        ledger_date: String,
    },
    /// `{date: "DD-MM-YYYY"}`.
    Period {
        /// Period date.
        date: String,
    },
    /// `{date: "DD-MM-YYYY", sisaHasilUsahaAmount: number}`.
    Closing {
        /// Period-end date.
        date: String,
        /// Sisa Hasil Usaha, a JSON number.
        #[serde(rename = "sisaHasilUsahaAmount", with = "money::as_number")]
        sisa_hasil_usaha_amount: Money,
    },
}

impl PostingCommand {
    /// Builds a command for a stage that needs only a date.
    ///
    /// Neraca Balance carries an amount and must be built from a
    /// `NeracaBalanceForm`.
    ///
    /// # Errors
    ///
    /// * `PostingError::UnpostNotSupported` for unposting Neraca Balance or Neraca Akhir
    /// * `PostingError::CalculationUnavailable` for posting Neraca Balance
    pub fn new(
        stage: PostingStage,
        action: PostingAction,
        date: NaiveDate,
    ) -> Result<Self, PostingError> {
        match (stage, action) {
            (PostingStage::BukuBesar, PostingAction::Post) => {
                Ok(Self::PostBukuBesar { ledger_date: date })
            }
            (PostingStage::BukuBesar, PostingAction::Unpost) => {
                Ok(Self::UnpostBukuBesar { ledger_date: date })
            }
            (PostingStage::NeracaDetail, PostingAction::Post) => Ok(Self::PostNeracaDetail { date }),
            (PostingStage::NeracaDetail, PostingAction::Unpost) => {
                Ok(Self::UnpostNeracaDetail { date })
            }
            (PostingStage::NeracaBalance, PostingAction::Post) => {
                Err(PostingError::CalculationUnavailable)
            }
            (PostingStage::NeracaAkhir, PostingAction::Post) => Ok(Self::PostNeracaAkhir { date }),
            (PostingStage::NeracaBalance | PostingStage::NeracaAkhir, PostingAction::Unpost) => {
                Err(PostingError::UnpostNotSupported { stage })
            }
        }
    }

    /// The stage this command acts on.
    #[must_use]
    pub const fn stage(&self) -> PostingStage {
        match self {
            Self::PostBukuBesar { .. } | Self::UnpostBukuBesar { .. } => PostingStage::BukuBesar,
            Self::PostNeracaDetail { .. } | Self::UnpostNeracaDetail { .. } => {
                PostingStage::NeracaDetail
            }
            Self::PostNeracaBalance { .. } => PostingStage::NeracaBalance,
            Self::PostNeracaAkhir { .. } => PostingStage::NeracaAkhir,
        }
    }

    /// Post or unpost.
    #[must_use]
    pub const fn action(&self) -> PostingAction {
        match self {
            Self::UnpostBukuBesar { .. } | Self::UnpostNeracaDetail { .. } => PostingAction::Unpost,
            Self::PostBukuBesar { .. }
            | Self::PostNeracaDetail { .. }
            | Self::PostNeracaBalance { .. }
            | Self::PostNeracaAkhir { .. } => PostingAction::Post,
        }
    }

    /// The date the command refers to.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match *self {
            Self::PostBukuBesar { ledger_date } | Self::UnpostBukuBesar { ledger_date } => {
                ledger_date
            }
            Self::PostNeracaDetail { date }
            | Self::UnpostNeracaDetail { date }
            | Self::PostNeracaBalance { date, .. }
            | Self::PostNeracaAkhir { date } => date,
        }
    }

    /// Endpoint path relative to the API base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::PostBukuBesar { .. } => "/posting/buku-besar",
            Self::UnpostBukuBesar { .. } => "/posting/unposting/buku-besar",
            Self::PostNeracaDetail { .. } => "/posting/neraca-detail",
            Self::UnpostNeracaDetail { .. } => "/posting/unposting/neraca-detail",
            Self::PostNeracaBalance { .. } => "/posting/neraca-balance",
            Self::PostNeracaAkhir { .. } => "/posting/neraca-akhir",
        }
    }

    /// Request body with the date in the stage's wire format.
    #[must_use]
    pub fn body(&self) -> PostingBody {
        let date = self.stage().date_format().format(self.date());
        match *self {
            Self::PostBukuBesar { .. } | Self::UnpostBukuBesar { .. } => {
                PostingBody::Ledger { ledger_date: date }
            }
            Self::PostNeracaDetail { .. }
            | Self::UnpostNeracaDetail { .. }
            | Self::PostNeracaAkhir { .. } => PostingBody::Period { date },
            Self::PostNeracaBalance {
                sisa_hasil_usaha_amount,
                ..
            } => PostingBody::Closing {
                date,
                sisa_hasil_usaha_amount,
            },
        }
    }
}
