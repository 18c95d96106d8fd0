use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde_json::Value;

use fintrack_core::{Clock, NormalizeService};
use fintrack_domain::{Kind, LedgerEntry, NegativeAmountPolicy, RawEntry, UserId};

use super::{CollectionSnapshot, DocumentStore, Listener, Subscription};
use crate::errors::{FinError, Result};
use crate::utils::SystemClock;

type CollectionKey = (UserId, Kind);

struct ListenerSlot {
    key: CollectionKey,
    listener: Listener,
}

#[derive(Default)]
struct Collection {
    revision: u64,
    entries: Vec<LedgerEntry>,
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<CollectionKey, Collection>,
    listeners: HashMap<u64, ListenerSlot>,
    next_listener_id: u64,
}

impl StoreState {
    fn append(&mut self, key: CollectionKey, entries: impl IntoIterator<Item = LedgerEntry>) {
        let collection = self.collections.entry(key).or_default();
        collection.entries.extend(entries);
        collection.revision += 1;
    }

    fn snapshot(&self, key: &CollectionKey) -> CollectionSnapshot {
        let (revision, entries) = self
            .collections
            .get(key)
            .map(|c| (c.revision, c.entries.clone()))
            .unwrap_or_default();
        CollectionSnapshot {
            kind: key.1,
            revision,
            entries,
        }
    }
}

/// In-process [`DocumentStore`]. Clones share the same collections.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
    negative_amounts: NegativeAmountPolicy,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            clock,
            negative_amounts: NegativeAmountPolicy::default(),
        }
    }

    pub fn with_negative_amounts(mut self, policy: NegativeAmountPolicy) -> Self {
        self.negative_amounts = policy;
        self
    }

    /// Loads previously stored records (a JSON array) into `user`'s collection.
    ///
    /// Records go through the read path, so a missing date becomes `Unknown`
    /// rather than today. Records without an id receive a generated one.
    pub fn import(&self, user: &UserId, kind: Kind, records: &Value) -> Result<usize> {
        let mut entries = NormalizeService::normalize_snapshot(records, kind, self.negative_amounts)?;
        for entry in &mut entries {
            if entry.id.is_empty() {
                entry.id = LedgerEntry::generate_id();
            }
            entry.user_id = user.clone();
        }
        let count = entries.len();
        self.lock()?.append((user.clone(), kind), entries);
        tracing::debug!(user = %user, kind = %kind, count, "imported stored records");
        self.notify(user, kind)?;
        Ok(count)
    }

    /// Number of live listeners across all collections.
    pub fn listener_count(&self) -> usize {
        self.lock().map(|state| state.listeners.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| FinError::Store("memory store lock poisoned".into()))
    }

    /// Delivers the current snapshot to every listener of the collection.
    /// Listeners run after the lock is released so they may call back into the store.
    fn notify(&self, user: &UserId, kind: Kind) -> Result<()> {
        let (snapshot, listeners) = {
            let state = self.lock()?;
            let key = (user.clone(), kind);
            let snapshot = state.snapshot(&key);
            let listeners: Vec<Listener> = state
                .listeners
                .values()
                .filter(|slot| slot.key == key)
                .map(|slot| Arc::clone(&slot.listener))
                .collect();
            (snapshot, listeners)
        };
        tracing::debug!(
            user = %user,
            kind = %kind,
            listeners = listeners.len(),
            revision = snapshot.revision,
            "notifying subscribers"
        );
        for listener in listeners {
            listener(&snapshot);
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn add(&self, user: &UserId, kind: Kind, raw: RawEntry) -> Result<LedgerEntry> {
        let entry = NormalizeService::normalize(&raw, kind, self.clock.as_ref(), self.negative_amounts)
            .with_id(LedgerEntry::generate_id())
            .with_owner(user.clone())
            .with_created_at(self.clock.now());
        self.lock()?.append((user.clone(), kind), [entry.clone()]);
        tracing::debug!(user = %user, kind = %kind, entry = %entry.id, "entry added");
        self.notify(user, kind)?;
        Ok(entry)
    }

    fn snapshot(&self, user: &UserId, kind: Kind) -> Result<Vec<LedgerEntry>> {
        Ok(self.lock()?.snapshot(&(user.clone(), kind)).entries)
    }

    fn subscribe(&self, user: &UserId, kind: Kind, listener: Listener) -> Result<Subscription> {
        let (id, snapshot) = {
            let mut state = self.lock()?;
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            let key = (user.clone(), kind);
            let snapshot = state.snapshot(&key);
            state.listeners.insert(
                id,
                ListenerSlot {
                    key,
                    listener: Arc::clone(&listener),
                },
            );
            (id, snapshot)
        };
        tracing::debug!(user = %user, kind = %kind, listener = id, "subscribed");

        let weak: Weak<Mutex<StoreState>> = Arc::downgrade(&self.state);
        let subscription = Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                if let Ok(mut state) = state.lock() {
                    state.listeners.remove(&id);
                    tracing::debug!(listener = id, "unsubscribed");
                }
            }
        });

        listener(&snapshot);
        Ok(subscription)
    }
}
