//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading store settings
//! and seed data from YAML files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::{AttendanceError, AttendanceResult};
use crate::store::{AttendanceStore, Clock, SeedData};

use super::types::StoreConfig;

/// Loads and provides access to store configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── store.yaml   # Store-wide settings (required)
/// └── seed.yaml    # Initial records and events (optional)
/// ```
///
/// When `seed.yaml` is absent the store is seeded with demo data for the
/// month containing the clock's current date.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use attendance_engine::config::ConfigLoader;
/// use attendance_engine::store::SystemClock;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let store = loader.into_store(Arc::new(SystemClock));
/// println!("Records: {}", store.get_all_attendance_data().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: StoreConfig,
    seed: Option<SeedData>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `store.yaml` is missing
    /// - Either file contains invalid YAML or malformed values
    pub fn load<P: AsRef<Path>>(path: P) -> AttendanceResult<Self> {
        let path = path.as_ref();

        let config = Self::load_yaml::<StoreConfig>(&path.join("store.yaml"))?;

        let seed_path = path.join("seed.yaml");
        let seed = if seed_path.exists() {
            Some(Self::load_yaml::<SeedData>(&seed_path)?)
        } else {
            None
        };

        info!(
            path = %path.display(),
            seeded = seed.is_some(),
            "Loaded store configuration"
        );

        Ok(Self { config, seed })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> AttendanceResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AttendanceError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| AttendanceError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the store settings.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the seed read from `seed.yaml`, if the file was present.
    pub fn seed(&self) -> Option<&SeedData> {
        self.seed.as_ref()
    }

    /// Builds a store from the loaded settings and seed.
    pub fn into_store(self, clock: Arc<dyn Clock>) -> AttendanceStore {
        let seed = match self.seed {
            Some(seed) => seed,
            None => SeedData::demo(clock.now().date(), &self.config),
        };
        AttendanceStore::new(self.config, seed, clock)
    }
}
