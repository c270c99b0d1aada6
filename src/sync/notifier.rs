use crate::application_impl::SESSION_KEY;
use crate::application_port::SessionService;
use crate::domain_model::SponsorList;
use crate::domain_port::{KeyValueStore, SponsorRepo, Subscription};
use crate::infra_store::SPONSORS_KEY;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

type SponsorWatcher = Arc<dyn Fn(&SponsorList) + Send + Sync>;
type SessionWatcher = Arc<dyn Fn(bool) + Send + Sync>;

/// Converges the live views of one tab onto state written by other tabs.
///
/// Subscribes to the two tracked keys on this tab's store handle. A
/// sponsor-list change re-reads through the repository and fans the fresh
/// list out to every registered watcher; a session change re-evaluates
/// authentication and fans out the fresh flag. Nothing else is tracked, and
/// same-tab writes never arrive here; callers that mutate state refresh
/// their own views at the call site.
pub struct SyncNotifier {
    inner: Arc<NotifierInner>,
    _store_subscriptions: [Subscription; 2],
}

struct NotifierInner {
    sponsor_repo: Arc<dyn SponsorRepo>,
    session_service: Arc<dyn SessionService>,
    sponsor_watchers: Mutex<Vec<(u64, SponsorWatcher)>>,
    session_watchers: Mutex<Vec<(u64, SessionWatcher)>>,
    next_id: AtomicU64,
}

impl SyncNotifier {
    pub fn new(
        store: &dyn KeyValueStore,
        sponsor_repo: Arc<dyn SponsorRepo>,
        session_service: Arc<dyn SessionService>,
    ) -> Self {
        let inner = Arc::new(NotifierInner {
            sponsor_repo,
            session_service,
            sponsor_watchers: Mutex::new(Vec::new()),
            session_watchers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        });

        let on_sponsors = inner.clone();
        let sponsor_subscription =
            store.subscribe(SPONSORS_KEY, Arc::new(move |_| on_sponsors.push_sponsors()));

        let on_session = inner.clone();
        let session_subscription =
            store.subscribe(SESSION_KEY, Arc::new(move |_| on_session.push_session()));

        Self {
            inner,
            _store_subscriptions: [sponsor_subscription, session_subscription],
        }
    }

    /// Receive every sponsor list written by another tab. Dropping the
    /// handle deregisters the watcher.
    pub fn watch_sponsors(
        &self,
        watcher: impl Fn(&SponsorList) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.sponsor_watchers).push((id, Arc::new(watcher)));

        let inner = self.inner.clone();
        Subscription::new(move || {
            lock(&inner.sponsor_watchers).retain(|(watcher_id, _)| *watcher_id != id);
        })
    }

    /// Receive the authentication state after another tab touches the
    /// session record.
    pub fn watch_session(&self, watcher: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.session_watchers).push((id, Arc::new(watcher)));

        let inner = self.inner.clone();
        Subscription::new(move || {
            lock(&inner.session_watchers).retain(|(watcher_id, _)| *watcher_id != id);
        })
    }
}

impl NotifierInner {
    fn push_sponsors(&self) {
        let list = self.sponsor_repo.list();
        tracing::debug!(len = list.len(), "external sponsor change, fanning out");
        let watchers: Vec<SponsorWatcher> = lock(&self.sponsor_watchers)
            .iter()
            .map(|(_, watcher)| watcher.clone())
            .collect();
        for watcher in watchers {
            watcher(&list);
        }
    }

    fn push_session(&self) {
        let authenticated = self.session_service.is_authenticated();
        tracing::debug!(authenticated, "external session change, fanning out");
        let watchers: Vec<SessionWatcher> = lock(&self.session_watchers)
            .iter()
            .map(|(_, watcher)| watcher.clone())
            .collect();
        for watcher in watchers {
            watcher(authenticated);
        }
    }
}

fn lock<T>(watchers: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    watchers.lock().unwrap_or_else(|e| e.into_inner())
}
