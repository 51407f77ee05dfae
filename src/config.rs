use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "TC_CONFIG_FILE";

const DEFAULT_WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("tripcal").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".tripcal.toml"));
    }

    locations
}

pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => Config::from_file(&location),
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interval of update ticks in milliseconds
    pub tick_rate: u64,
    /// Column labels, Sunday first
    pub weekday_labels: Vec<String>,
    pub today_symbol: Option<char>,
    pub focus_symbol: Option<char>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate: 500,
            weekday_labels: DEFAULT_WEEKDAY_LABELS
                .iter()
                .map(|&label| label.to_owned())
                .collect(),
            today_symbol: Some('*'),
            focus_symbol: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        log::info!("Loading config from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorKind::IOError(e),
                &format!("Could not read {}", path.display()),
            )
        })?;

        content.parse()
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate)
    }

    fn validated(mut self) -> Self {
        if self.weekday_labels.len() != 7 {
            log::warn!(
                "Expected 7 weekday labels, got {}; using defaults",
                self.weekday_labels.len()
            );
            self.weekday_labels = Config::default().weekday_labels;
        }

        if self.tick_rate == 0 {
            log::warn!("tick_rate must be positive; using default");
            self.tick_rate = Config::default().tick_rate;
        }

        self
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Config> {
        let config: Config = toml::from_str(s)?;
        Ok(config.validated())
    }
}
