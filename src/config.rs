//! Site configuration.
//!
//! Values are layered lowest to highest: built-in defaults, an optional
//! JSON/TOML/.env file, a `.env` in the working directory, then
//! `RAIDBOT_`-prefixed environment variables (`RAIDBOT_PORT=8080`,
//! `RAIDBOT_PRODUCTION=true`, ...).

use raidbot_config::{ConfigManager, ConfigValidator, Result, Validate};
use raidbot_i18n::LocaleCookie;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix for site settings.
pub const ENV_PREFIX: &str = "RAIDBOT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub host: String,
    pub port: u16,
    /// Marks the locale cookie `Secure` and makes the sitemap use `https`.
    pub production: bool,
    /// Origin for canonical links, without a trailing slash.
    pub base_url: String,
    /// Directory of `<locale>/translations.json`; the embedded catalog when unset.
    pub locales_dir: Option<PathBuf>,
    /// Ceiling for the client runtime initialization, in milliseconds.
    pub init_ceiling_ms: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            production: false,
            base_url: "https://rslbot.com".to_string(),
            locales_dir: None,
            init_ceiling_ms: raidbot_i18n::runtime::DEFAULT_INIT_CEILING.as_millis() as u64,
        }
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.host, "host")?;
        ConfigValidator::in_range(self.port, 1, u16::MAX, "port")?;
        ConfigValidator::is_base_url(&self.base_url, "base_url")?;
        ConfigValidator::in_range(self.init_ceiling_ms, 1, 60_000, "init_ceiling_ms")?;
        Ok(())
    }
}

impl SiteConfig {
    /// Load the layered configuration, with `file` as the optional file layer.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let manager = ConfigManager::with_prefix(ENV_PREFIX);
        manager.load_defaults(&SiteConfig::default())?;
        if let Some(path) = file {
            manager.load_file(path)?;
        }
        manager.load_dotenv(None)?;
        manager.load_env()?;
        manager.extract()
    }

    /// Resolve `host:port`.
    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn init_ceiling(&self) -> Duration {
        Duration::from_millis(self.init_ceiling_ms)
    }

    /// The locale cookie as configured for this environment.
    pub fn cookie(&self) -> LocaleCookie {
        LocaleCookie::new(self.production)
    }
}
