use crate::storage::Storage;
use anyhow::{Context, bail};
use std::path::PathBuf;
use std::time::Duration;

/// Bundled config for builds without a `.env` next to them (mobile, wasm)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_SIMULATION_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    /// `None` uses the platform default location.
    pub storage_dir: Option<PathBuf>,
    pub simulate_chat: bool,
    pub simulation_interval: Duration,
    pub demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_dir: None,
            simulate_chat: true,
            simulation_interval: DEFAULT_SIMULATION_INTERVAL,
            demo_data: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let api_base_url = lookup("CAPAFRONT_API_BASE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            bail!("CAPAFRONT_API_BASE_URL must be an http(s) URL, got '{api_base_url}'");
        }

        let storage_dir = lookup("CAPAFRONT_STORAGE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let simulate_chat = match lookup("CAPAFRONT_SIMULATE_CHAT") {
            Some(raw) => parse_flag(&raw).context("CAPAFRONT_SIMULATE_CHAT")?,
            None => defaults.simulate_chat,
        };

        let demo_data = match lookup("CAPAFRONT_DEMO_DATA") {
            Some(raw) => parse_flag(&raw).context("CAPAFRONT_DEMO_DATA")?,
            None => defaults.demo_data,
        };

        let simulation_interval = match lookup("CAPAFRONT_SIMULATION_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("CAPAFRONT_SIMULATION_INTERVAL_SECS: '{raw}'"))?;
                if secs == 0 {
                    bail!("CAPAFRONT_SIMULATION_INTERVAL_SECS must be positive");
                }
                Duration::from_secs(secs)
            }
            None => defaults.simulation_interval,
        };

        Ok(Self {
            api_base_url,
            storage_dir,
            simulate_chat,
            simulation_interval,
            demo_data,
        })
    }

    pub fn storage(&self) -> Storage {
        match &self.storage_dir {
            Some(dir) => Storage::at(dir),
            None => Storage::platform_default(),
        }
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean flag, got '{other}'"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if std::env::var(key).is_err() {
            // SAFETY: called from main before the UI runtime spawns any threads
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(text: &str) -> Vec<(&str, &str)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}
