//! Composition root: config, catalog, store worker and display settings.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use quest_shared::{
    BadgeTriggers, Catalog, CompletionPolicy, FileBackend, Locale, MemoryBackend, Os,
    ProgressStore, QuestConfig, StoreHandle, StoreWorker,
};

/// Command-line overrides applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub locale: Option<Locale>,
    pub data_dir: Option<PathBuf>,
    pub ephemeral: bool,
}

pub struct App {
    pub catalog: Catalog,
    pub store: StoreHandle,
    pub locale: Locale,
    pub os: Os,
    pub triggers: BadgeTriggers,
    pub policy: CompletionPolicy,
    pub step_delay: Duration,
    worker: JoinHandle<ProgressStore>,
}

impl App {
    /// Build everything from a loaded config; must run inside a tokio runtime
    pub async fn open(config: &QuestConfig, overrides: Overrides) -> Result<Self> {
        let catalog = match &config.catalog.path {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?,
            None => Catalog::builtin().context("Bundled catalog is invalid")?,
        };

        let store = if overrides.ephemeral {
            ProgressStore::new(MemoryBackend::new())
        } else {
            let dir = match &overrides.data_dir {
                Some(dir) => dir.clone(),
                None => config.data_dir(),
            };
            debug!(dir = %dir.display(), "using file storage");
            ProgressStore::new(FileBackend::new(dir))
        };
        Self::with_store(catalog, store, config, overrides).await
    }

    /// Assemble around an already-built store
    pub async fn with_store(
        catalog: Catalog,
        store: ProgressStore,
        config: &QuestConfig,
        overrides: Overrides,
    ) -> Result<Self> {
        let (store, worker) = StoreWorker::spawn(store);
        let profile = store.profile().await?;

        // Flag > config file > stored profile
        let locale = overrides
            .locale
            .or(config.profile.locale)
            .unwrap_or(profile.locale);
        let os = config.profile.os.unwrap_or(profile.os);

        Ok(Self {
            catalog,
            store,
            locale,
            os,
            triggers: BadgeTriggers::default(),
            policy: config.completion_policy(),
            step_delay: config.step_delay(),
            worker,
        })
    }

    pub async fn is_degraded(&self) -> bool {
        self.store.is_degraded().await.unwrap_or(true)
    }

    /// Drop the handle and wait for queued writes to land
    pub async fn shutdown(self) -> Result<()> {
        let App { store, worker, .. } = self;
        drop(store);
        match worker.await {
            Ok(store) => {
                if store.is_degraded() {
                    warn!(backend = %store.backend_name(), "session ended with unsaved progress");
                }
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!("store worker failed: {}", e)),
        }
    }
}
