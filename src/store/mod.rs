//! Document store seam: per-user collections of entries with push subscriptions.

mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use fintrack_domain::{Kind, LedgerEntry, RawEntry, UserId};

use crate::errors::Result;

/// Full contents of one user's collection at a given revision.
///
/// Revisions increase with every change to the collection, so a consumer can
/// discard a snapshot that arrives after a newer one.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot {
    pub kind: Kind,
    pub revision: u64,
    pub entries: Vec<LedgerEntry>,
}

/// Callback receiving each new snapshot of a collection.
pub type Listener = Arc<dyn Fn(&CollectionSnapshot) + Send + Sync>;

/// Holds per-user income and expense collections.
///
/// Every call names the user explicitly; implementations never consult an
/// ambient signed-in user.
pub trait DocumentStore: Send + Sync {
    /// Normalizes `raw` as a new entry, assigns its identity, stores it and
    /// notifies subscribers of that collection.
    fn add(&self, user: &UserId, kind: Kind, raw: RawEntry) -> Result<LedgerEntry>;

    fn snapshot(&self, user: &UserId, kind: Kind) -> Result<Vec<LedgerEntry>>;

    /// Registers `listener` for `user`'s `kind` collection. The listener is
    /// called once with the current snapshot, then after every change, until
    /// the returned handle is cancelled or dropped.
    fn subscribe(&self, user: &UserId, kind: Kind, listener: Listener) -> Result<Subscription>;
}

/// Scoped handle for a live query. Unsubscribes on [`Subscription::cancel`] or drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + Send + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.dispose.is_some()
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
