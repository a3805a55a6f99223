// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;

/// Reads `PREFIX_SOME_KEY` variables as `some_key` entries.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Collect every variable under the prefix from the process environment.
    pub fn load(&self) -> HashMap<String, String> {
        self.load_from(std::env::vars())
    }

    /// Collect variables under the prefix from an explicit set of pairs.
    pub fn load_from<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| self.strip(&key).map(|k| (k, value)))
            .collect()
    }

    fn strip(&self, key: &str) -> Option<String> {
        match self.prefix {
            Some(ref prefix) => {
                let rest = key.strip_prefix(prefix.as_str())?.strip_prefix('_')?;
                if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_lowercase())
                }
            }
            None => Some(key.to_lowercase()),
        }
    }

    /// Load a single variable, applying the prefix.
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        };

        std::env::var(&full_key).map_err(ConfigError::EnvError)
    }

    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Type an environment string after the value it replaces.
///
/// Only a key currently holding a number or boolean is coerced, so
/// `RAIDBOT_PORT=8080` becomes a number while `RAIDBOT_HOST=0` and unset
/// optional keys stay strings.
pub fn coerce_like(current: Option<&serde_json::Value>, raw: &str) -> serde_json::Value {
    match current {
        Some(serde_json::Value::Number(_) | serde_json::Value::Bool(_)) => coerce_scalar(raw),
        _ => serde_json::Value::String(raw.to_string()),
    }
}

/// `"8080"` becomes a number and `"true"` a boolean; anything else stays a string.
fn coerce_scalar(raw: &str) -> serde_json::Value {
    let trimmed = raw.trim();
    match trimmed {
        "true" => return serde_json::Value::Bool(true),
        "false" => return serde_json::Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return serde_json::Value::from(n);
    }
    if let Ok(f) = trimmed.parse::<f64>()
        && let Some(n) = serde_json::Number::from_f64(f)
    {
        return serde_json::Value::Number(n);
    }
    serde_json::Value::String(raw.to_string())
}
