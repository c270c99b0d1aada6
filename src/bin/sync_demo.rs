/// Two store tabs in one process: tab A writes the sponsor list, tab B's
/// sync notifier re-reads it and pushes the fresh list into a public view.
/// Ends with the deliberate last-write-wins overlap between stale tabs.
use skydeck::application_impl::{FixedCredentials, StoreSessionService};
use skydeck::application_port::{LoginInput, SessionService};
use skydeck::domain_model::SponsorRecord;
use skydeck::domain_port::{KeyValueStore, SponsorRepo};
use skydeck::infra_store::{KvSponsorRepo, LocalStore};
use skydeck::sync::SyncNotifier;
use skydeck::view::PublicSponsorView;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::new("skydeck=debug,sync_demo=debug"))
        .with(fmt::layer())
        .init();

    let store = LocalStore::in_memory();

    let tab_a: Arc<dyn KeyValueStore> = Arc::new(store.tab());
    let repo_a: Arc<dyn SponsorRepo> = Arc::new(KvSponsorRepo::new(tab_a.clone()));
    let session_a: Arc<dyn SessionService> = Arc::new(StoreSessionService::new(
        tab_a.clone(),
        Arc::new(FixedCredentials::default()),
    ));

    let tab_b: Arc<dyn KeyValueStore> = Arc::new(store.tab());
    let repo_b: Arc<dyn SponsorRepo> = Arc::new(KvSponsorRepo::new(tab_b.clone()));
    let session_b: Arc<dyn SessionService> = Arc::new(StoreSessionService::new(
        tab_b.clone(),
        Arc::new(FixedCredentials::default()),
    ));

    let notifier_b = SyncNotifier::new(tab_b.as_ref(), repo_b.clone(), session_b.clone());
    let public_b = PublicSponsorView::mount(repo_b.as_ref(), &notifier_b);
    let _session_watch = notifier_b.watch_session(|authenticated| {
        println!("tab B sees session: {authenticated}");
    });

    println!("tab B starts hidden: {}", public_b.is_hidden());

    // Session changes in tab A surface in tab B.
    session_a.login(LoginInput {
        username: "admin".to_owned(),
        password: "admin123".to_owned(),
    })?;

    // Sponsor writes in tab A surface in tab B's public view.
    repo_a.create(SponsorRecord::new(
        "Acme",
        "https://acme.test/logo.png",
        "https://acme.test",
    ))?;
    println!(
        "tab B sees {} sponsor(s): {:?}",
        public_b.sponsors().len(),
        public_b
            .sponsors()
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
    );

    // Last write wins: both repositories extend their own copy, nothing
    // merges. Tab A never re-read after B's write, so its next write
    // discards B's record.
    repo_b.create(SponsorRecord::new(
        "Globex",
        "https://globex.test/logo.png",
        "https://globex.test",
    ))?;
    repo_a.create(SponsorRecord::new(
        "Initech",
        "https://initech.test/logo.png",
        "https://initech.test",
    ))?;
    println!(
        "after the overlap both tabs read: {:?}",
        repo_b
            .list()
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
    );

    session_a.logout()?;

    Ok(())
}
