//! Period-close posting workflow.
//!
//! Four stages run in order for each period: Buku Besar, Neraca Detail,
//! Neraca Balance and Neraca Akhir. The first two can be unposted; the last
//! two are irreversible, and Neraca Akhir closes the period.

pub mod command;
pub mod dates;
pub mod error;
pub mod neraca_balance;
pub mod period;
pub mod service;
pub mod stage;

#[cfg(test)]
mod period_props;

pub use command::{PostingBody, PostingCommand};
pub use dates::{DateFormat, iso_to_day_month_year, parse_iso};
pub use error::PostingError;
pub use neraca_balance::{CalculationDetails, NeracaBalanceCalculation, NeracaBalanceForm};
pub use period::PeriodState;
pub use service::{PostingService, PostingTransition};
pub use stage::{PostingAction, PostingStage};
