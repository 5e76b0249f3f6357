//! Process-wide persistence context.

use crate::AutoopConfig;
use autoop_database::Database;
use autoop_error::{AutoopResult, ConfigError};
use autoop_registry::ArtifactRegistry;
use autoop_storage::{LocalStorage, Storage};
use parking_lot::Mutex;
use std::sync::Arc;

static INSTANCE: Mutex<Option<Arc<System>>> = parking_lot::const_mutex(None);

/// One storage backend, one database over it and one artifact registry over
/// both.
///
/// Construct it explicitly with [`System::open`] and pass it where
/// persistence is needed, or use [`System::get_instance`] for the lazily
/// initialized process instance. Either way, everything wired through one
/// `System` observes the same state.
pub struct System {
    config: AutoopConfig,
    storage: Arc<dyn Storage>,
    database: Arc<Database>,
    registry: ArtifactRegistry,
}

impl System {
    /// Build a system from configuration.
    ///
    /// Creates the storage base directory if needed and loads the entries
    /// already persisted.
    ///
    /// # Errors
    ///
    /// Fails if the base directory cannot be created, a configured namespace
    /// is invalid, the payload prefix overlaps the database root, or existing
    /// entries cannot be parsed.
    #[tracing::instrument(skip(config), fields(base_path = %config.storage().base_path().display()))]
    pub fn open(config: AutoopConfig) -> AutoopResult<Self> {
        let storage: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(config.storage().base_path())?);
        let database = Arc::new(Database::with_root(
            storage.clone(),
            config.database().root(),
        )?);
        let registry = ArtifactRegistry::with_namespace(
            database.clone(),
            storage.clone(),
            config.registry().collection().as_str(),
            config.registry().objects_prefix(),
        )?;

        tracing::info!("Opened autoop system");
        Ok(Self {
            config,
            storage,
            database,
            registry,
        })
    }

    /// The process instance, created from [`AutoopConfig::load`] on first call.
    ///
    /// Every call returns the same `Arc` and refreshes the database so that
    /// changes made by other writers become visible.
    ///
    /// # Errors
    ///
    /// Fails if configuration cannot be loaded, the system cannot be opened,
    /// or the refresh fails.
    pub fn get_instance() -> AutoopResult<Arc<System>> {
        let mut instance = INSTANCE.lock();

        if let Some(system) = instance.as_ref() {
            system.database.refresh()?;
            return Ok(system.clone());
        }

        tracing::debug!("Initializing process system");
        let system = Arc::new(System::open(AutoopConfig::load()?)?);
        *instance = Some(system.clone());
        Ok(system)
    }

    /// Make `system` the process instance returned by [`System::get_instance`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a process instance already exists.
    pub fn install(system: System) -> AutoopResult<Arc<System>> {
        let mut instance = INSTANCE.lock();
        if instance.is_some() {
            return Err(ConfigError::new("autoop system already initialized").into());
        }

        let system = Arc::new(system);
        *instance = Some(system.clone());
        tracing::info!("Installed process system");
        Ok(system)
    }

    /// Drop the process instance so the next [`System::get_instance`] builds
    /// a fresh one. Existing handles keep working.
    #[cfg(any(test, feature = "testing"))]
    pub fn reset_instance() {
        INSTANCE.lock().take();
    }

    /// Configuration this system was opened with.
    pub fn config(&self) -> &AutoopConfig {
        &self.config
    }

    /// Storage backend shared by the database and the registry.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Metadata database.
    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// Artifact registry.
    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }
}
