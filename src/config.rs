use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::deadeye::Capture;
use crate::error::AppError;

const DEFAULT_CONFIG_FILE: &str = "config/default";
const ENV_PREFIX: &str = "DEADEYE";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub link: LinkSettings,
    pub vision: VisionSettings,
    pub deadeye: DeadeyeSettings,
    pub scheduler: SchedulerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            link: LinkSettings::default(),
            vision: VisionSettings::default(),
            deadeye: DeadeyeSettings::default(),
            scheduler: SchedulerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkSettings {
    pub bind_address: String,
    pub channel_capacity: usize,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5800".to_string(),
            channel_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    pub camera: String,
    pub capture: Capture,
    pub target_log_interval_secs: f64,
    pub fps_log_interval_secs: f64,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            camera: "A0".to_string(),
            capture: Capture::default(),
            target_log_interval_secs: 5.0,
            fps_log_interval_secs: 10.0,
        }
    }
}

impl VisionSettings {
    pub fn target_log_interval(&self) -> Result<Duration, ConfigError> {
        interval("vision.target_log_interval_secs", self.target_log_interval_secs)
    }

    pub fn fps_log_interval(&self) -> Result<Duration, ConfigError> {
        interval("vision.fps_log_interval_secs", self.fps_log_interval_secs)
    }
}

fn interval(key: &str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ConfigError::Message(format!("{key} = {secs}: {e}")))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeadeyeSettings {
    pub camera: String,
}

impl Default for DeadeyeSettings {
    fn default() -> Self {
        Self {
            camera: "W0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub period_ms: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self { period_ms: 20 }
    }
}

impl SchedulerSettings {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl Settings {
    /// Layers `config/default.toml`, an optional user file and `DEADEYE_*` environment
    /// variables over the built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            Config::builder().add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::validated(settings.try_deserialize()?)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, AppError> {
        let settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Self::validated(settings.try_deserialize()?)
    }

    fn validated(settings: Self) -> Result<Self, AppError> {
        settings.vision.target_log_interval()?;
        settings.vision.fps_log_interval()?;
        if settings.scheduler.period_ms == 0 {
            let message = "scheduler.period_ms must be positive".to_string();
            return Err(ConfigError::Message(message).into());
        }
        Ok(settings)
    }
}
