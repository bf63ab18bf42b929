use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::infra::linear::DEFAULT_API_URL;
use crate::workflow::batch::DEFAULT_PACE;

const CONFIG_DIR_ENV: &str = "SWEEP_CONFIG_DIR";
const CONFIG_FILE_NAME: &str = "config.json";
const UNSET: &str = "<not set>";

/// Settings after merging the stored file with environment overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub team_key: Option<String>,
    pub state_name: Option<String>,
    pub pace: Duration,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::resolve(StoredConfig::load()?, |key| env::var(key).ok())
    }

    pub fn resolve(stored: StoredConfig, env: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let pace = match lookup("SWEEP_PACE_MS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|err| {
                AppError::Configuration(format!("SWEEP_PACE_MS must be milliseconds: {err}"))
            })?),
            None => stored.pace_ms,
        }
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_PACE);

        Ok(Self {
            api_url: lookup("SWEEP_API_URL")
                .or(stored.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: lookup("SWEEP_API_KEY")
                .or_else(|| lookup("LINEAR_API_KEY"))
                .or(stored.api_key),
            team_key: lookup("SWEEP_TEAM").or(stored.team_key),
            state_name: lookup("SWEEP_STATE").or(stored.state_name),
            pace,
        })
    }
}

/// On-disk settings edited by `sweep config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_ms: Option<u64>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Label and value pairs for display, with the API key masked.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let shown = |value: Option<&str>| {
            value
                .filter(|value| !value.is_empty())
                .unwrap_or(UNSET)
                .to_string()
        };
        vec![
            ("API URL", shown(self.api_url.as_deref())),
            ("API key", mask_secret(self.api_key.as_deref().unwrap_or_default())),
            ("Default team", shown(self.team_key.as_deref())),
            ("Default state", shown(self.state_name.as_deref())),
            (
                "Delay between tickets",
                self.pace_ms
                    .map_or_else(|| UNSET.to_string(), |ms| format!("{ms} ms")),
            ),
        ]
    }
}

/// Keeps three characters at each end of keys longer than six characters.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0 => UNSET.to_string(),
        len if len > 6 => {
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[len - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        _ => "***".to_string(),
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("sweep"))
        .ok_or_else(|| AppError::Configuration("unable to locate a config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
