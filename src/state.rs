use std::{io, sync::Arc};

use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::models::Workspace;
use crate::settings::Settings;
use crate::store::Store;

/// Page collections plus the policies they are classified with.
#[derive(Debug, Clone, Default)]
pub struct Db {
    pub settings: Settings,
    pub workspace: Workspace,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RwLock<Db>>,
    pub clock: Arc<dyn Clock>,
    pub store: Store,
}

impl AppState {
    pub fn new(db: Db, clock: impl Clock + 'static, store: Store) -> Self {
        Self {
            db: Arc::new(RwLock::new(db)),
            clock: Arc::new(clock),
            store,
        }
    }

    /// Settings and the important-dates cache come from the store;
    /// every other page starts empty.
    pub fn load(store: Store, clock: impl Clock + 'static) -> io::Result<Self> {
        let settings = match store.load_settings()? {
            Some(settings) => settings,
            None => {
                tracing::info!(dir = %store.dir().display(), "no saved settings, using defaults");
                Settings::default()
            }
        };
        let important_dates = store.load_important_dates()?;
        tracing::info!(count = important_dates.len(), "loaded important dates cache");

        let db = Db {
            settings,
            workspace: Workspace {
                important_dates,
                ..Workspace::default()
            },
        };
        Ok(Self::new(db, clock, store))
    }
}
