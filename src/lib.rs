pub mod clamp;
pub mod config;
pub mod css;
pub mod error;
pub mod injection;
pub mod logging;
pub mod portability;
pub mod storage;
pub mod store;
pub mod tokens;

use std::path::Path;
use std::rc::Rc;

pub use config::{load_engine_config, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use injection::{InjectionScheduler, StyleSink, SystemClock};
pub use store::{HydrationSummary, TokenStores};

use css::OptimizationReport;
use portability::ImportReport;
use storage::{FileStorage, KeyValueStorage};

/// Hydrated token stores plus the configuration they were opened with.
pub struct Engine {
    config: EngineConfig,
    stores: TokenStores,
    hydration: HydrationSummary,
}

impl Engine {
    /// Open file-backed stores (configured directory or the XDG default) and hydrate them.
    pub fn open(config: EngineConfig) -> EngineResult<Self> {
        let storage = match &config.storage_dir {
            Some(dir) => FileStorage::with_path(dir.clone()),
            None => FileStorage::with_default_path()?,
        };
        tracing::debug!(dir = ?storage.dir(), "opening token storage");
        Ok(Self::with_storage(config, Rc::new(storage)))
    }

    pub fn with_storage(config: EngineConfig, storage: Rc<dyn KeyValueStorage>) -> Self {
        let stores = TokenStores::with_storage(storage);
        let hydration = stores.hydrate_all();
        tracing::info!(?hydration, "token stores ready");
        Self {
            config,
            stores,
            hydration,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stores(&self) -> &TokenStores {
        &self.stores
    }

    pub fn hydration(&self) -> &HydrationSummary {
        &self.hydration
    }

    /// Scheduler over this engine's stores, driven by the system clock. Not yet mounted.
    pub fn scheduler<S: StyleSink + 'static>(&self, sink: S) -> InjectionScheduler<S> {
        InjectionScheduler::from_config(
            self.stores.clone(),
            sink,
            Rc::new(SystemClock),
            &self.config,
        )
    }

    /// Write a backup of every store to `path`.
    pub fn export_to_file(&self, path: &Path) -> EngineResult<()> {
        Ok(portability::export_to_file(&self.stores, path)?)
    }

    /// Validate a backup file and merge it into the stores; nothing changes on error.
    pub fn import_file(&self, path: &Path) -> EngineResult<ImportReport> {
        let settings = portability::import_from_file(path)?;
        let report = portability::apply_settings(&self.stores, &settings);
        tracing::info!(path = %path.display(), ?report, "settings imported");
        Ok(report)
    }

    /// Generate and optimize the stylesheet for the current token values.
    pub fn render(&self) -> OptimizationReport {
        let css = css::generate(
            &self.stores.colors.snapshot(),
            &self.stores.typography.snapshot(),
            &self.stores.spacing.snapshot(),
        );
        css::optimize(&css)
    }
}
