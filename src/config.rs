use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::clock::DEFAULT_REFRESH_INTERVAL;
use crate::detect::ConfidenceThreshold;
use crate::scenario::Scenario;

pub const CONFIG_ENV: &str = "STATION_WATCH_CONFIG";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct MonitorConfigFile {
    scenario: Option<Scenario>,
    threshold: Option<f32>,
    audio_enabled: Option<bool>,
    recording: Option<bool>,
    refresh_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub scenario: Scenario,
    pub threshold: ConfidenceThreshold,
    pub audio_enabled: bool,
    pub recording: bool,
    pub refresh_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            scenario: Scenario::Normal,
            threshold: ConfidenceThreshold::default(),
            audio_enabled: true,
            recording: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl MonitorConfig {
    /// Defaults, then the optional config file, then environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|path| !path.trim().is_empty());
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: MonitorConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let threshold = match file.threshold {
            Some(value) => ConfidenceThreshold::new(value)?,
            None => defaults.threshold,
        };
        Ok(Self {
            scenario: file.scenario.unwrap_or(defaults.scenario),
            threshold,
            audio_enabled: file.audio_enabled.unwrap_or(defaults.audio_enabled),
            recording: file.recording.unwrap_or(defaults.recording),
            refresh_interval: file
                .refresh_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.refresh_interval),
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(scenario) = non_blank_env("STATION_WATCH_SCENARIO") {
            self.scenario = scenario.parse()?;
        }
        if let Some(threshold) = non_blank_env("STATION_WATCH_THRESHOLD") {
            let value: f32 = threshold
                .trim()
                .parse()
                .map_err(|_| anyhow!("STATION_WATCH_THRESHOLD must be a number"))?;
            self.threshold = ConfidenceThreshold::new(value)?;
        }
        if let Some(audio) = non_blank_env("STATION_WATCH_AUDIO") {
            self.audio_enabled = parse_flag(&audio)
                .ok_or_else(|| anyhow!("STATION_WATCH_AUDIO must be one of 1/0/true/false/on/off"))?;
        }
        if let Some(refresh) = non_blank_env("STATION_WATCH_REFRESH_MS") {
            let ms: u64 = refresh.trim().parse().map_err(|_| {
                anyhow!("STATION_WATCH_REFRESH_MS must be an integer number of milliseconds")
            })?;
            self.refresh_interval = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            return Err(anyhow!("refresh interval must be greater than zero"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<MonitorConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
