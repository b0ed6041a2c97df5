//! Volunteer Connect in the terminal, driven by the connect-router hash router.

mod app;
mod model;
mod pages;
mod terminal;

use anyhow::Context as _;
use connect_router::{
    Application, AuthService, ContactStore, Document, EventStore, Location, Router, RouterConfig, Storage,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use crate::app::Shell;

fn data_dir() -> PathBuf {
    std::env::var_os("CONNECT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("volunteer-connect"))
}

/// Log to a file; the terminal belongs to the UI.
fn init_tracing(dir: &std::path::Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(dir.join("connect-demo.log")).context("failed to create log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Stored events, or the seed events on first run.
fn load_events(path: &std::path::Path) -> anyhow::Result<EventStore> {
    let store = EventStore::load(path)?;
    if store.is_empty()? {
        return Ok(EventStore::with_events(serde_json::from_str(model::SEED_EVENTS)?));
    }
    Ok(store)
}

fn load_contacts(path: &std::path::Path) -> anyhow::Result<ContactStore> {
    let store = ContactStore::load(path)?;
    if store.is_empty()? {
        return Ok(ContactStore::with_contacts(serde_json::from_str(model::SEED_CONTACTS)?));
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    init_tracing(&dir)?;
    tracing::info!("Volunteer Connect initializing");

    let config = RouterConfig::load(dir.join("router.json"))?;
    let local_path = dir.join("local-storage.json");
    let local = Storage::load(&local_path)?;
    let auth = Arc::new(AuthService::new(Storage::new(), local.clone()).with_directory_json(model::USERS_JSON)?);

    let events_path = dir.join("events.json");
    let events = load_events(&events_path)?;
    let contacts_path = dir.join("contacts.json");
    let contacts = load_contacts(&contacts_path)?;

    let pages = pages::registry(auth.clone(), events.clone(), contacts.clone());
    let location = Location::default();
    let document = Document::new(model::nav_links(auth.is_logged_in()));
    let router = Arc::new(
        Router::new(pages.route_table()?, auth.clone(), Arc::new(location.clone()))
            .with_config(config)
            .with_sink(Arc::new(document.clone())),
    );
    pages.attach(&router);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let host = tokio::spawn(Application::new(router.clone(), location.clone()).run(async move {
        let _ = stop_rx.await;
    }));

    let shell = Shell::new(router, location, document, auth.clone(), events.clone(), contacts.clone());
    let result = terminal::run(shell, auth.subscribe()).await;

    let _ = stop_tx.send(());
    host.await.context("router host panicked")??;
    local.save(&local_path)?;
    events.save(&events_path)?;
    contacts.save(&contacts_path)?;
    tracing::info!("Volunteer Connect stopped");
    result
}
