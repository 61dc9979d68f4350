use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use riki_history::{load_dir, save_page, HistoryStore, InMemoryHistoryStore};
use riki_query::HistoryQuery;
use riki_types::PageSlug;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    query: Arc<HistoryQuery<InMemoryHistoryStore>>,
    data_dir: Option<PathBuf>,
    snapshot_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Build state from config, loading any snapshots found in `data_dir`.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let store = match &config.data_dir {
            Some(dir) => load_dir(dir)?,
            None => InMemoryHistoryStore::new(),
        };
        Ok(Self::new(store, config))
    }

    /// Build state around an existing store.
    pub fn new(store: InMemoryHistoryStore, config: &ServerConfig) -> Self {
        Self {
            query: Arc::new(HistoryQuery::with_config(
                Arc::new(store),
                config.query_config(),
            )),
            data_dir: config.data_dir.clone(),
            snapshot_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn query(&self) -> &HistoryQuery<InMemoryHistoryStore> {
        &self.query
    }

    /// Write the current history of `page` to disk, if a data directory is
    /// configured.
    ///
    /// Snapshots are taken under a lock so the last file written always holds
    /// the newest history read.
    pub fn persist(&self, page: &PageSlug) -> ServerResult<()> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        let _guard = self
            .snapshot_lock
            .lock()
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        if let Some(history) = self.query.store().history(page)? {
            let path = save_page(dir, &history)?;
            info!(%page, path = %path.display(), "history snapshot saved");
        }
        Ok(())
    }
}
