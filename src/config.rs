use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use log::info;
use serde::{Deserialize, Serialize};
use crate::error::{Result, VaultKeyError};
use crate::logging::LogLevel;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_level: LogLevel,
    pub api: ApiConfig,
    pub redemption: RedemptionConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub widget_base_url: String,
    pub activity_widget_id: u32,
    pub referer: String,
    pub origin: String,
    pub user_agent: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RedemptionConfig {
    /// Number of job-status polls before a SHiFT redemption times out.
    pub max_polls: u32,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: PathBuf::from("vaultkey.db"),
            log_level: LogLevel::default(),
            api: ApiConfig::default(),
            redemption: RedemptionConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "https://api.2k.com/borderlands".to_string(),
            widget_base_url: "https://2kgames.crowdtwist.com".to_string(),
            activity_widget_id: 9904,
            referer: "https://borderlands.com/en-US/vip/".to_string(),
            origin: "https://borderlands.com".to_string(),
            user_agent: "vaultkey/0.1".to_string(),
        }
    }
}

impl Default for RedemptionConfig {
    fn default() -> Self {
        RedemptionConfig {
            max_polls: 10,
            poll_interval_ms: 1000,
        }
    }
}

impl RedemptionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "vaultkey.toml";

    /// Reads the config at `path`, writing out the defaults first if it doesn't exist yet.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| VaultKeyError::Config(format!("{}: {}", path.display(), e)))
        } else {
            let config = Self::default();
            config.save(path)?;
            info!("Wrote default configuration to {}", path.display());
            Ok(config)
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| VaultKeyError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            log_level = "debug"

            [redemption]
            max_polls = 3
            "#,
        ).unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.redemption.max_polls, 3);
        assert_eq!(config.redemption.poll_interval_ms, 1000);
        assert_eq!(config.api.base_url, "https://api.2k.com/borderlands");
        assert_eq!(config.database_path, PathBuf::from("vaultkey.db"));
    }

    #[test]
    fn rejects_bad_types() {
        let dir = std::env::temp_dir().join(format!("vaultkey-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        fs::write(&path, "[redemption]\nmax_polls = \"lots\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, VaultKeyError::Config(_)));

        fs::remove_dir_all(&dir).ok();
    }
}
