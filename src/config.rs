use anyhow::{Context, Result, anyhow, bail};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = ".prodreport";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_INPUT_FILE: &str = "production.xlsx";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: PathBuf,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        default_root_dir().join(CONFIG_FILE)
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    pub fn load_or_default() -> Result<Self> {
        Self::load().or_else(|_| {
            let config = Self::default();
            config.save()?;
            Ok(config)
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match normalize_config_key(key) {
            "input_path" => {
                if value.trim().is_empty() {
                    bail!("input_path must not be empty");
                }
                self.input_path = expand_home(value.trim());
            }
            "smtp_host" => {
                if value.trim().is_empty() {
                    bail!("smtp_host must not be empty");
                }
                self.smtp_host = value.trim().to_string();
            }
            "smtp_port" => {
                self.smtp_port = value
                    .parse::<u16>()
                    .map_err(|_| anyhow!("smtp_port must be a number"))?;
            }
            _ => {
                bail!(
                    "Unsupported config key: {key}. Supported keys: input_path|input.path, smtp_host|smtp.host, smtp_port|smtp.port"
                );
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        match normalize_config_key(key) {
            "input_path" => Some(self.input_path.display().to_string()),
            "smtp_host" => Some(self.smtp_host.clone()),
            "smtp_port" => Some(self.smtp_port.to_string()),
            _ => None,
        }
    }
}

fn normalize_config_key(key: &str) -> &str {
    match key {
        "input_path" | "input.path" => "input_path",
        "smtp_host" | "smtp.host" => "smtp_host",
        "smtp_port" | "smtp.port" => "smtp_port",
        _ => key,
    }
}

pub fn expand_home(raw: &str) -> PathBuf {
    raw.strip_prefix("~/")
        .and_then(|stripped| home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| PathBuf::from(raw))
}

fn default_root_dir() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_production_workbook() {
        let config = Config::default();

        assert_eq!(config.input_path, PathBuf::from("production.xlsx"));
        assert_eq!(config.smtp_port, 587);
    }

    #[test]
    fn set_value_accepts_aliased_keys() {
        let mut config = Config::default();

        config.set_value("input.path", "data/day.csv").expect("key set");
        config.set_value("smtp.port", "2525").expect("key set");

        assert_eq!(config.input_path, PathBuf::from("data/day.csv"));
        assert_eq!(config.smtp_port, 2525);
    }

    #[test]
    fn set_value_rejects_unknown_keys() {
        let mut config = Config::default();

        let error = config.set_value("polling_seconds", "300").expect_err("rejected");

        assert!(error.to_string().contains("Unsupported config key"));
    }

    #[test]
    fn set_value_rejects_bad_port() {
        let mut config = Config::default();

        assert!(config.set_value("smtp_port", "not-a-port").is_err());
    }

    #[test]
    fn get_value_round_trips() {
        let config = Config::default();

        assert_eq!(config.get_value("smtp_host").as_deref(), Some("smtp.gmail.com"));
        assert_eq!(config.get_value("unknown"), None);
    }
}
