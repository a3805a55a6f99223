use raidbot_config::{ConfigError, ConfigManager, ConfigValidator, Result, Validate};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Serialize, Deserialize, Debug)]
struct SiteSettings {
    host: String,
    port: u16,
    locales_dir: Option<String>,
}

impl Validate for SiteSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.host, "host")?;
        ConfigValidator::in_range(self.port, 1, u16::MAX, "port")
    }
}

fn defaults() -> SiteSettings {
    SiteSettings {
        host: "127.0.0.1".to_string(),
        port: 3000,
        locales_dir: None,
    }
}

#[test]
fn test_toml_file_overlays_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "port = 4100\nlocales_dir = \"/srv/raidbot/locales\"").unwrap();

    let manager = ConfigManager::new();
    manager.load_defaults(&defaults()).unwrap();
    manager.load_file(file.path()).unwrap();

    let settings: SiteSettings = manager.extract().unwrap();
    assert_eq!(settings.host, "127.0.0.1");
    assert_eq!(settings.port, 4100);
    assert_eq!(settings.locales_dir.as_deref(), Some("/srv/raidbot/locales"));
}

#[test]
fn test_json_file_overlays_defaults() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"host": "0.0.0.0"}}"#).unwrap();

    let manager = ConfigManager::new();
    manager.load_defaults(&defaults()).unwrap();
    manager.load_file(file.path()).unwrap();

    let settings: SiteSettings = manager.extract().unwrap();
    assert_eq!(settings.host, "0.0.0.0");
    assert_eq!(settings.port, 3000);
}

#[test]
fn test_env_file_keeps_numeric_paths_as_strings() {
    let mut file = tempfile::Builder::new().suffix(".env").tempfile().unwrap();
    writeln!(file, "HOST=0\nPORT=4200\nLOCALES_DIR=2025").unwrap();

    let manager = ConfigManager::new();
    manager.load_defaults(&defaults()).unwrap();
    manager.load_file(file.path()).unwrap();

    let settings: SiteSettings = manager.extract().unwrap();
    assert_eq!(settings.host, "0");
    assert_eq!(settings.port, 4200);
    assert_eq!(settings.locales_dir.as_deref(), Some("2025"));
}

#[test]
fn test_invalid_port_fails_validation() {
    let manager = ConfigManager::new();
    manager.load_defaults(&defaults()).unwrap();
    manager.set("port", 0).unwrap();

    assert!(matches!(
        manager.extract::<SiteSettings>(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_missing_file_is_a_load_error() {
    let manager = ConfigManager::new();
    let result = manager.load_file("/nonexistent/raidbot.toml");
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}
