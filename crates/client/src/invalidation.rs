//! Cache invalidation broadcast.
//!
//! Posting state is never cached as a source of truth. After a mutation
//! the views that show affected data are told to refetch.

use neraca_core::posting::PostingStage;
use tokio::sync::broadcast;
use tracing::debug;

/// A group of cached views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// Ledger listings.
    Ledgers,
    /// Posting dashboard counts and statuses.
    PostingDashboard,
    /// Neraca Balance records.
    NeracaBalance,
    /// Neraca Akhir records.
    NeracaAkhir,
}

impl CacheTag {
    /// Views affected by a ledger batch submission.
    pub const LEDGER_SUBMISSION: &'static [Self] = &[Self::Ledgers, Self::PostingDashboard];

    /// Views affected by posting or unposting `stage`.
    #[must_use]
    pub const fn affected_by(stage: PostingStage) -> &'static [Self] {
        match stage {
            PostingStage::BukuBesar => &[Self::Ledgers, Self::PostingDashboard],
            PostingStage::NeracaDetail => &[Self::PostingDashboard],
            PostingStage::NeracaBalance => &[Self::PostingDashboard, Self::NeracaBalance],
            PostingStage::NeracaAkhir => &[Self::PostingDashboard, Self::NeracaAkhir],
        }
    }
}

const DEFAULT_CAPACITY: usize = 64;

/// Broadcasts cache tags to every subscriber.
#[derive(Debug, Clone)]
pub struct Invalidator {
    sender: broadcast::Sender<CacheTag>,
}

impl Default for Invalidator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Invalidator {
    /// Creates a broadcaster buffering up to `capacity` tags per slow subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to future invalidations.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheTag> {
        self.sender.subscribe()
    }

    /// Announces that `tags` are stale.
    pub fn invalidate(&self, tags: &[CacheTag]) {
        for &tag in tags {
            // No subscribers is not an error
            if self.sender.send(tag).is_err() {
                debug!(?tag, "No cache subscribers");
            }
        }
    }
}
