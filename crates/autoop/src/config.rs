//! Configuration for the persistence layer.
//!
//! Configuration sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (autoop.toml shipped with the library)
//! 2. User config in home directory (~/.config/autoop/autoop.toml)
//! 3. User config in current directory (./autoop.toml)
//! 4. Environment variables (`AUTOOP__STORAGE__BASE_PATH`, ...)

use autoop_error::{AutoopError, AutoopResult, ConfigError};
use autoop_registry::{DEFAULT_COLLECTION, DEFAULT_OBJECTS_PREFIX};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Where blobs live on disk.
///
/// ```toml
/// [storage]
/// base_path = "./assets"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StorageConfig {
    /// Base directory of the local storage backend.
    #[serde(default = "default_base_path")]
    base_path: PathBuf,
}

impl StorageConfig {
    /// Storage rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(default_base_path())
    }
}

fn default_base_path() -> PathBuf {
    PathBuf::from("./assets")
}

/// Where the database keeps its entries inside storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct DatabaseConfig {
    /// Storage prefix holding one subtree per collection.
    #[serde(default = "default_database_root")]
    root: String,
}

impl DatabaseConfig {
    /// Database entries under `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(default_database_root())
    }
}

fn default_database_root() -> String {
    "dbo".to_string()
}

/// Artifact registry namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RegistryConfig {
    /// Database collection holding artifact metadata.
    #[serde(default = "default_collection")]
    collection: String,
    /// Storage prefix holding artifact payloads.
    #[serde(default = "default_objects_prefix")]
    objects_prefix: String,
}

impl RegistryConfig {
    /// Registry metadata in `collection`, payloads under `objects_prefix`.
    pub fn new(collection: impl Into<String>, objects_prefix: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            objects_prefix: objects_prefix.into(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new(default_collection(), default_objects_prefix())
    }
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_objects_prefix() -> String {
    DEFAULT_OBJECTS_PREFIX.to_string()
}

/// Top-level autoop configuration.
///
/// # Example
///
/// ```
/// use autoop::{AutoopConfig, DatabaseConfig, StorageConfig};
///
/// let config = AutoopConfig::builder()
///     .storage(StorageConfig::new("/tmp/autoop"))
///     .database(DatabaseConfig::new("metadata"))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.database().root(), "metadata");
/// assert_eq!(config.registry().collection(), "artifacts");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct AutoopConfig {
    /// Storage backend settings.
    #[serde(default)]
    #[builder(default)]
    storage: StorageConfig,
    /// Database settings.
    #[serde(default)]
    #[builder(default)]
    database: DatabaseConfig,
    /// Artifact registry settings.
    #[serde(default)]
    #[builder(default)]
    registry: RegistryConfig,
}

impl AutoopConfigBuilder {
    /// Build the AutoopConfig.
    ///
    /// # Errors
    ///
    /// Returns error if the builder state is incomplete.
    pub fn build(&self) -> AutoopResult<AutoopConfig> {
        self.build_internal()
            .map_err(|e| ConfigError::new(e.to_string()).into())
    }
}

impl AutoopConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> AutoopConfigBuilder {
        AutoopConfigBuilder::default()
    }

    /// Load configuration from a specific file path.
    ///
    /// Sections or keys missing from the file take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> AutoopResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                AutoopError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AutoopError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and will be silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use autoop::AutoopConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = AutoopConfig::load()?;
    /// println!("Storing artifacts under {}", config.storage().base_path().display());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> AutoopResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../autoop.toml");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/autoop/autoop.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional)
        builder = builder.add_source(File::with_name("autoop").required(false));

        // Environment overrides, e.g. AUTOOP__STORAGE__BASE_PATH
        builder = builder.add_source(
            Environment::with_prefix("AUTOOP")
                .prefix_separator("__")
                .separator("__"),
        );

        builder
            .build()
            .map_err(|e| {
                AutoopError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                AutoopError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
