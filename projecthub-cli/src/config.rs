use anyhow::{Context, Result};
use projecthub::domain::{assignments::BillingSwitchPolicy, money::DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides `data_dir` from the config file.
pub const DATA_DIR_ENV: &str = "PROJECTHUB_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HubConfig {
    /// Directory holding the JSON collections. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Currency used for declared and net values.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub billing_switch_policy: BillingSwitchPolicy,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            currency: default_currency(),
            billing_switch_policy: BillingSwitchPolicy::default(),
        }
    }
}

impl HubConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("projecthub")
            .join("config.toml"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Write config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    /// Where the data lives: `env_override`, then `data_dir`, then the platform default.
    pub fn resolve_data_dir(&self, env_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = env_override.filter(|d| !d.as_os_str().is_empty()) {
            return Ok(dir);
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Ok(dirs::data_dir()
            .context("Cannot determine data directory")?
            .join("projecthub"))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        self.resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HubConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, HubConfig::default());
        assert_eq!(config.currency, "USD");
        assert_eq!(config.billing_switch_policy, BillingSwitchPolicy::Preserve);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "billing-switch-policy = \"clear-inactive\"\n").unwrap();

        let config = HubConfig::load_from(&path).unwrap();
        assert_eq!(
            config.billing_switch_policy,
            BillingSwitchPolicy::ClearInactive
        );
        assert_eq!(config.currency, "USD");
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = HubConfig {
            data_dir: Some(dir.path().join("data")),
            currency: "EUR".to_string(),
            billing_switch_policy: BillingSwitchPolicy::ClearInactive,
        };
        config.save_to(&path).unwrap();
        assert_eq!(HubConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "billing-switch-policy = \"sometimes\"\n").unwrap();
        assert!(HubConfig::load_from(&path).is_err());
    }

    #[test]
    fn env_override_wins_over_config() {
        let config = HubConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..HubConfig::default()
        };
        assert_eq!(
            config
                .resolve_data_dir(Some(PathBuf::from("/from/env")))
                .unwrap(),
            PathBuf::from("/from/env")
        );
        assert_eq!(
            config.resolve_data_dir(Some(PathBuf::new())).unwrap(),
            PathBuf::from("/from/config")
        );
        assert_eq!(
            config.resolve_data_dir(None).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
