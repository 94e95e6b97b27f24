use std::path::Path;
use std::sync::Arc;

use chrono::NaiveTime;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::warn;

use crate::types::Settings;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub interpreter: InterpreterConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InterpreterConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    #[serde(default = "default_wake_word")]
    pub wake_word: String,
    #[serde(default = "default_summary_time")]
    pub summary_time: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_word: default_wake_word(),
            summary_time: default_summary_time(),
        }
    }
}

fn default_wake_word() -> String {
    Settings::default().wake_word
}
fn default_summary_time() -> String {
    Settings::default().summary_time
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    /// Poll interval for the summary trigger. Coarser than minute
    /// resolution is fine; the per-day guard absorbs repeated ticks.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
        }
    }
}

fn default_tick_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate();
        Ok(config)
    }

    /// Load `path` if it exists, otherwise run on defaults (no API key set
    /// means the interpreter will fail per-command, which the pipeline
    /// already recovers from).
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "No config file found; using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) {
        if NaiveTime::parse_from_str(&self.assistant.summary_time, "%H:%M").is_err() {
            // A malformed time never matches the clock, so the daily
            // summary silently never fires. Worth a loud warning.
            warn!(
                summary_time = %self.assistant.summary_time,
                "summary_time is not HH:MM; the daily summary will never fire"
            );
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            wake_word: self.assistant.wake_word.clone(),
            summary_time: self.assistant.summary_time.clone(),
        }
    }
}

/// Shared handle to the current [`Settings`]. Saves replace the whole value;
/// readers (scheduler poll, wake gate) pick the new settings up on their
/// next use, with no migration of in-flight state.
#[derive(Clone)]
pub struct SharedSettings {
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub async fn get(&self) -> Settings {
        self.inner.read().await.clone()
    }

    /// Wholesale replacement; there is no partial update. This is the save
    /// entry point for the settings UI collaborator.
    #[allow(dead_code)]
    pub async fn replace(&self, settings: Settings) {
        *self.inner.write().await = settings;
    }
}
