use crate::error::{Back2woError, Result};
use back2wo_common::{ModeFlow, Timing};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_ANALYSIS_DELAY: &str = "BACK2WO_ANALYSIS_DELAY_MS";
pub const ENV_REVEAL_INTERVAL: &str = "BACK2WO_REVEAL_INTERVAL_MS";
pub const ENV_MODE_FLOW: &str = "BACK2WO_MODE_FLOW";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    #[serde(flatten)]
    pub timing: Timing,
    pub mode_flow: ModeFlow,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        // 環境変数を優先
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Back2woError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("back2wo").join("config.json"))
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ANALYSIS_DELAY) {
            self.timing.analysis_delay_ms = parse_millis(ENV_ANALYSIS_DELAY, &value)?;
        }
        if let Some(value) = lookup(ENV_REVEAL_INTERVAL) {
            self.timing.reveal_interval_ms = parse_millis(ENV_REVEAL_INTERVAL, &value)?;
        }
        if let Some(value) = lookup(ENV_MODE_FLOW) {
            self.mode_flow = value.parse().map_err(Back2woError::Config)?;
        }
        Ok(())
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Back2woError::Config(format!("{} はミリ秒の整数で指定してください: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timing.analysis_delay_ms, 2000);
        assert_eq!(config.timing.reveal_interval_ms, 1500);
        assert_eq!(config.mode_flow, ModeFlow::Selector);
    }

    #[test]
    fn test_config_json_partial() {
        let config: Config = serde_json::from_str(r#"{"modeFlow": "direct-switch"}"#).unwrap();
        assert_eq!(config.mode_flow, ModeFlow::DirectSwitch);
        assert_eq!(config.timing, Timing::default());
    }

    #[test]
    fn test_config_json_flat_timing() {
        let config: Config = serde_json::from_str(r#"{"analysisDelayMs": 300, "revealIntervalMs": 100}"#).unwrap();
        assert_eq!(config.timing, Timing { analysis_delay_ms: 300, reveal_interval_ms: 100 });
        assert_eq!(config.mode_flow, ModeFlow::Selector);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(lookup(&[
                (ENV_ANALYSIS_DELAY, "10"),
                (ENV_REVEAL_INTERVAL, " 5 "),
                (ENV_MODE_FLOW, "direct-switch"),
            ]))
            .unwrap();

        assert_eq!(config.timing.analysis_delay_ms, 10);
        assert_eq!(config.timing.reveal_interval_ms, 5);
        assert_eq!(config.mode_flow, ModeFlow::DirectSwitch);
    }

    #[test]
    fn test_env_override_invalid() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(lookup(&[(ENV_REVEAL_INTERVAL, "fast")]))
            .unwrap_err();
        assert!(matches!(err, Back2woError::Config(_)));
        assert_eq!(config.timing.reveal_interval_ms, 1500);
    }
}
