//! Live report session: subscribes to one user's income and expense
//! collections and re-renders on every change notification.

use std::sync::{Arc, Mutex, MutexGuard};

use fintrack_core::{Report, ReportService};
use fintrack_domain::{Kind, LedgerEntry, ReportOptions, UserId};

use crate::errors::{FinError, Result};
use crate::render::ChartRenderer;
use crate::store::{CollectionSnapshot, DocumentStore, Subscription};

#[derive(Default)]
struct Snapshots {
    income: Vec<LedgerEntry>,
    income_revision: u64,
    expenses: Vec<LedgerEntry>,
    expenses_revision: u64,
    generation: u64,
}

impl Snapshots {
    /// Stores `snapshot` unless a newer revision of that collection is already held.
    fn accept(&mut self, snapshot: &CollectionSnapshot) -> bool {
        let (entries, revision) = match snapshot.kind {
            Kind::Income => (&mut self.income, &mut self.income_revision),
            Kind::Expense => (&mut self.expenses, &mut self.expenses_revision),
        };
        if snapshot.revision < *revision {
            return false;
        }
        *revision = snapshot.revision;
        *entries = snapshot.entries.clone();
        self.generation += 1;
        true
    }
}

#[derive(Default)]
struct Delivered {
    generation: u64,
    report: Option<Report>,
}

struct SessionState {
    user: UserId,
    options: ReportOptions,
    renderer: Arc<dyn ChartRenderer>,
    snapshots: Mutex<Snapshots>,
    delivered: Mutex<Delivered>,
    render_gate: Mutex<()>,
}

impl SessionState {
    fn on_snapshot(&self, snapshot: &CollectionSnapshot) {
        let (generation, income, expenses) = {
            let Ok(mut snapshots) = self.snapshots.lock() else {
                tracing::warn!(user = %self.user, "session snapshot lock poisoned");
                return;
            };
            if !snapshots.accept(snapshot) {
                tracing::debug!(
                    user = %self.user,
                    kind = %snapshot.kind,
                    revision = snapshot.revision,
                    "ignoring out-of-order snapshot"
                );
                return;
            }
            (
                snapshots.generation,
                snapshots.income.clone(),
                snapshots.expenses.clone(),
            )
        };

        let report = ReportService::build_with_options(&income, &expenses, &self.options);

        // Held through render so deliveries reach the renderer in generation order.
        let Ok(_gate) = self.render_gate.lock() else {
            tracing::warn!(user = %self.user, "session render lock poisoned");
            return;
        };
        {
            let Ok(mut delivered) = self.delivered.lock() else {
                tracing::warn!(user = %self.user, "session delivery lock poisoned");
                return;
            };
            if generation <= delivered.generation {
                tracing::debug!(
                    user = %self.user,
                    generation,
                    latest = delivered.generation,
                    "dropping stale report"
                );
                return;
            }
            delivered.generation = generation;
            delivered.report = Some(report.clone());
        }
        self.renderer.render(&report);
    }
}

/// Keeps a report current for one user until closed or dropped.
pub struct ReportSession {
    state: Arc<SessionState>,
    subscriptions: Vec<Subscription>,
}

impl ReportSession {
    pub fn open(
        store: &dyn DocumentStore,
        user: UserId,
        options: ReportOptions,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Result<Self> {
        let state = Arc::new(SessionState {
            user,
            options,
            renderer,
            snapshots: Mutex::new(Snapshots::default()),
            delivered: Mutex::new(Delivered::default()),
            render_gate: Mutex::new(()),
        });

        let mut subscriptions = Vec::with_capacity(Kind::ALL.len());
        for kind in Kind::ALL {
            let listener_state = Arc::clone(&state);
            let subscription = store.subscribe(
                &state.user,
                kind,
                Arc::new(move |snapshot: &CollectionSnapshot| listener_state.on_snapshot(snapshot)),
            )?;
            subscriptions.push(subscription);
        }
        tracing::debug!(user = %state.user, "report session opened");

        Ok(Self {
            state,
            subscriptions,
        })
    }

    pub fn user(&self) -> &UserId {
        &self.state.user
    }

    /// The most recently rendered report.
    pub fn latest(&self) -> Result<Option<Report>> {
        Ok(self.delivered()?.report.clone())
    }

    /// Generation of the most recently rendered report.
    pub fn generation(&self) -> Result<u64> {
        Ok(self.delivered()?.generation)
    }

    /// Unsubscribes from both collections.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.cancel();
        }
        tracing::debug!(user = %self.state.user, "report session closed");
    }

    fn delivered(&self) -> Result<MutexGuard<'_, Delivered>> {
        self.state
            .delivered
            .lock()
            .map_err(|_| FinError::Store("session delivery lock poisoned".into()))
    }
}

impl Drop for ReportSession {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use fintrack_domain::NegativeAmountPolicy;
    use serde_json::json;
    use std::sync::{OnceLock, Weak};

    #[derive(Default)]
    struct Recorder {
        reports: Mutex<Vec<Report>>,
    }

    impl ChartRenderer for Recorder {
        fn render(&self, report: &Report) {
            self.reports.lock().unwrap().push(report.clone());
        }
    }

    #[test]
    fn stale_generation_is_not_delivered() {
        let renderer = Arc::new(Recorder::default());
        let state = SessionState {
            user: UserId::new("u1"),
            options: ReportOptions::default(),
            renderer: renderer.clone(),
            snapshots: Mutex::new(Snapshots::default()),
            delivered: Mutex::new(Delivered {
                generation: 5,
                report: None,
            }),
            render_gate: Mutex::new(()),
        };

        state.on_snapshot(&CollectionSnapshot {
            kind: Kind::Income,
            revision: 1,
            entries: vec![LedgerEntry::new(1.0, "A", "2025-01-01")],
        });
        assert!(renderer.reports.lock().unwrap().is_empty());
    }

    #[test]
    fn older_revision_is_ignored() {
        let mut snapshots = Snapshots::default();
        let newer = CollectionSnapshot {
            kind: Kind::Expense,
            revision: 3,
            entries: vec![LedgerEntry::new(2.0, "B", "2025-01-01"); 3],
        };
        let older = CollectionSnapshot {
            kind: Kind::Expense,
            revision: 2,
            entries: vec![LedgerEntry::new(2.0, "B", "2025-01-01"); 2],
        };
        assert!(snapshots.accept(&newer));
        assert!(!snapshots.accept(&older));
        assert_eq!(snapshots.expenses.len(), 3);
        assert_eq!(snapshots.generation, 1);
    }

    #[test]
    fn open_renders_initial_snapshots() {
        let store = MemoryStore::new();
        let user = UserId::new("u1");
        store
            .import(&user, Kind::Income, &json!([{"amount": 10, "source": "Gift", "date": "2025-01-01"}]))
            .unwrap();
        let renderer = Arc::new(Recorder::default());
        let session =
            ReportSession::open(&store, user, ReportOptions::default(), renderer.clone()).unwrap();

        assert_eq!(renderer.reports.lock().unwrap().len(), 2);
        assert_eq!(session.generation().unwrap(), 2);
        let latest = session.latest().unwrap().expect("report delivered");
        assert_eq!(latest.aggregate.total_income, 10.0);
    }

    #[test]
    fn zero_policy_applies_to_store_snapshots() {
        let store = MemoryStore::new();
        let user = UserId::new("u1");
        store
            .import(&user, Kind::Expense, &json!([{"amount": -20, "category": "Refund"}, {"amount": 5}]))
            .unwrap();
        let options = ReportOptions {
            negative_amounts: NegativeAmountPolicy::Zero,
            ..ReportOptions::default()
        };
        let session = ReportSession::open(&store, user, options, Arc::new(Recorder::default())).unwrap();

        let latest = session.latest().unwrap().expect("report delivered");
        assert_eq!(latest.aggregate.total_expenses, 5.0);
    }

    /// Reads the session's delivered state from inside `render`.
    #[derive(Default)]
    struct ReadsBack {
        state: OnceLock<Weak<SessionState>>,
        seen: Mutex<Vec<Option<u64>>>,
    }

    impl ChartRenderer for ReadsBack {
        fn render(&self, _report: &Report) {
            let state = self.state.get().and_then(Weak::upgrade).expect("session state");
            let generation = state.delivered.try_lock().ok().map(|d| d.generation);
            self.seen.lock().unwrap().push(generation);
        }
    }

    #[test]
    fn renderer_can_read_latest_while_rendering() {
        let renderer = Arc::new(ReadsBack::default());
        let state = Arc::new(SessionState {
            user: UserId::new("u1"),
            options: ReportOptions::default(),
            renderer: renderer.clone(),
            snapshots: Mutex::new(Snapshots::default()),
            delivered: Mutex::new(Delivered::default()),
            render_gate: Mutex::new(()),
        });
        renderer.state.set(Arc::downgrade(&state)).unwrap();

        state.on_snapshot(&CollectionSnapshot {
            kind: Kind::Income,
            revision: 1,
            entries: vec![LedgerEntry::new(1.0, "A", "2025-01-01")],
        });
        assert_eq!(*renderer.seen.lock().unwrap(), vec![Some(1)]);
    }
}
