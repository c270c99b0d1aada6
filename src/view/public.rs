use crate::domain_model::SponsorList;
use crate::domain_port::{SponsorRepo, Subscription};
use crate::sync::SyncNotifier;
use std::sync::{Arc, Mutex, MutexGuard};

/// Read-only sponsor strip on the public dashboard.
///
/// Seeds from the repository on mount, then follows lists pushed by the
/// sync notifier whenever another tab writes. While the list is empty the
/// section renders nothing at all.
pub struct PublicSponsorView {
    sponsors: Arc<Mutex<SponsorList>>,
    _subscription: Subscription,
}

impl PublicSponsorView {
    pub fn mount(repo: &dyn SponsorRepo, notifier: &SyncNotifier) -> Self {
        let sponsors = Arc::new(Mutex::new(repo.list()));

        let pushed = sponsors.clone();
        let subscription = notifier.watch_sponsors(move |list: &SponsorList| {
            *lock(&pushed) = list.clone();
        });

        Self {
            sponsors,
            _subscription: subscription,
        }
    }

    pub fn sponsors(&self) -> SponsorList {
        lock(&self.sponsors).clone()
    }

    pub fn is_hidden(&self) -> bool {
        lock(&self.sponsors).is_empty()
    }
}

fn lock(list: &Mutex<SponsorList>) -> MutexGuard<'_, SponsorList> {
    list.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{FixedCredentials, StoreSessionService};
    use crate::application_port::SessionService;
    use crate::domain_model::SponsorRecord;
    use crate::domain_port::KeyValueStore;
    use crate::infra_store::{KvSponsorRepo, LocalStore};

    #[test]
    fn test_hidden_until_a_sponsor_exists() {
        let store = LocalStore::in_memory();
        let tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());
        let repo: Arc<dyn SponsorRepo> = Arc::new(KvSponsorRepo::new(tab.clone()));
        let session: Arc<dyn SessionService> = Arc::new(StoreSessionService::new(
            tab.clone(),
            Arc::new(FixedCredentials::default()),
        ));
        let notifier = SyncNotifier::new(tab.as_ref(), repo.clone(), session);

        let view = PublicSponsorView::mount(repo.as_ref(), &notifier);
        assert!(view.is_hidden());

        // A write from another tab shows up through the notifier.
        let other_tab: Arc<dyn KeyValueStore> = Arc::new(store.tab());
        let other_repo = KvSponsorRepo::new(other_tab);
        other_repo
            .create(SponsorRecord::new(
                "Acme",
                "https://acme.test/logo.png",
                "https://acme.test",
            ))
            .unwrap();

        assert!(!view.is_hidden());
        assert_eq!(view.sponsors().len(), 1);
    }
}
