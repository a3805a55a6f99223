// Layered configuration for the RaidBot site
//
// Later layers overwrite earlier ones key by key:
// defaults, then a config file, then a `.env` file, then the environment.

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Flat key/value store that settings structs are extracted from.
#[derive(Clone, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an environment variable prefix such as `RAIDBOT`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: Arc::default(),
            env_prefix: Some(prefix.into()),
        }
    }

    /// Seed values from a serializable defaults struct.
    pub fn load_defaults<T: Serialize>(&self, defaults: &T) -> Result<()> {
        let value = serde_json::to_value(defaults)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;
        self.merge_object(value)
    }

    /// Overlay a JSON, TOML or env-format file; the format follows the extension.
    ///
    /// Env-format values are typed like environment variables.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let value = loader.load_file(path)?;
        if loader.format() != FileFormat::Env {
            return self.merge_object(value);
        }

        let serde_json::Value::Object(map) = value else {
            return Err(ConfigError::ParseError(
                "configuration root must be an object".to_string(),
            ));
        };
        self.apply_env(
            map.into_iter()
                .filter_map(|(key, value)| value.as_str().map(|v| (key, v.to_string())))
                .collect(),
        );
        Ok(())
    }

    /// Load a `.env` file into the process environment.
    ///
    /// With no path a missing `.env` is not an error.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                let _ = dotenvy::dotenv();
            }
        }
        Ok(())
    }

    /// Overlay prefixed variables from the process environment.
    pub fn load_env(&self) -> Result<()> {
        let loader = EnvLoader::new(self.env_prefix.clone());
        self.apply_env(loader.load());
        Ok(())
    }

    /// Overlay already-stripped environment pairs.
    pub fn apply_env(&self, vars: HashMap<String, String>) {
        let mut config = self.config.write();
        for (key, value) in vars {
            let typed = env::coerce_like(config.get(&key), &value);
            config.insert(key, typed);
        }
    }

    fn merge_object(&self, value: serde_json::Value) -> Result<()> {
        let serde_json::Value::Object(map) = value else {
            return Err(ConfigError::ParseError(
                "configuration root must be an object".to_string(),
            ));
        };

        let mut config = self.config.write();
        for (key, value) in map {
            config.insert(key, value);
        }
        Ok(())
    }

    pub fn set<T: Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        self.config.write().insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let config = self.config.read();
        let value = config
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::DeserializationError(format!("{}: {}", key, e)))
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.config.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.config.read().keys().cloned().collect()
    }

    /// Deserialize every key into `T` and run its validation.
    pub fn extract<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let json_value = serde_json::Value::Object(
            self.config
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        let settings: T = serde_json::from_value(json_value)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }
}
