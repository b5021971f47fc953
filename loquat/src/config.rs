//! Layered configuration: built-in defaults, then an optional TOML file, then
//! environment variables.
//!
//! ```rust
//! use loquat::config::LoquatConfig;
//!
//! let config = LoquatConfig::from_toml_str("model = \"gemini-1.5-pro\"\nmax_tokens = 512")
//!     .expect("config should parse")
//!     .with_env(|key| (key == "GEMINI_API_KEY").then(|| "secret".to_string()));
//!
//! assert_eq!(config.model, "gemini-1.5-pro");
//! assert_eq!(config.max_tokens, Some(512));
//! assert_eq!(config.api_key(), Some("secret"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

use lagent::DEFAULT_HISTORY_WINDOW;
use lobserve::DEFAULT_LOG_LEVEL;
use lprovider::{ProviderError, ProviderId};
use ltooling::calendar::{CalendarEvent, parse_date_time};
use serde::Deserialize;

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Io,
    Parse,
    Invalid,
    Provider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Io, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Parse, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ConfigErrorKind::Invalid, message)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

impl From<ProviderError> for ConfigError {
    fn from(value: ProviderError) -> Self {
        Self::new(ConfigErrorKind::Provider, value.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoquatConfig {
    pub provider: String,
    pub model: String,
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub history_window: usize,
    pub max_tokens: Option<u32>,
    pub log_level: String,
    pub debug_http: bool,
    pub calendar: CalendarConfig,
}

impl Default for LoquatConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            system_prompt: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_window: DEFAULT_HISTORY_WINDOW,
            max_tokens: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            debug_http: false,
            calendar: CalendarConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub events: Vec<CalendarEventConfig>,
}

/// Calendar entry seeded from configuration. Times are strings in any form
/// the calendar tool accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarEventConfig {
    pub title: String,
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl CalendarEventConfig {
    pub fn to_event(&self) -> Result<CalendarEvent, ConfigError> {
        let start = parse_date_time(&self.start).ok_or_else(|| {
            ConfigError::invalid(format!(
                "calendar event '{}' has an unreadable start '{}'",
                self.title, self.start
            ))
        })?;

        let mut event = CalendarEvent::new(self.title.clone(), start);
        if let Some(end) = self.end.as_deref() {
            let end = parse_date_time(end).ok_or_else(|| {
                ConfigError::invalid(format!(
                    "calendar event '{}' has an unreadable end '{end}'",
                    self.title
                ))
            })?;
            event = event.with_end(end);
        }
        if let Some(location) = self.location.as_deref() {
            event = event.with_location(location);
        }
        if let Some(link) = self.link.as_deref() {
            event = event.with_link(link);
        }
        Ok(event)
    }
}

impl LoquatConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|err| ConfigError::parse(err.to_string()))
    }

    /// Reads `path` when given. Without a path the built-in defaults are used.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let source = tokio::fs::read_to_string(path).await.map_err(|err| {
            ConfigError::io(format!("failed to read {}: {err}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&source)
    }

    /// Applies environment overrides through `lookup`. Blank values are ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(provider) = read("LLM_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = read("LLM_MODEL") {
            self.model = model;
        }
        if let Some(api_key) = read("GEMINI_API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Some(system_prompt) = read("LOQUAT_SYSTEM_PROMPT") {
            self.system_prompt = Some(system_prompt);
        }
        if let Some(base_url) = read("GEMINI_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(log_level) = read("RUST_LOG") {
            self.log_level = log_level;
        }
        if let Some(debug_http) = read("LOQUAT_DEBUG_HTTP") {
            self.debug_http = matches!(
                debug_http.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self
    }

    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    pub fn provider_id(&self) -> Result<ProviderId, ConfigError> {
        match ProviderId::parse(&self.provider) {
            Some(ProviderId::Gemini) => Ok(ProviderId::Gemini),
            _ => Err(ConfigError::invalid(format!(
                "unknown provider '{}'; supported: 'gemini'",
                self.provider.trim()
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.provider_id()?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs must be greater than zero"));
        }
        if self.max_tokens == Some(0) {
            return Err(ConfigError::invalid("max_tokens must be greater than zero"));
        }
        for event in &self.calendar.events {
            event.to_event()?;
        }
        Ok(())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn calendar_events(&self) -> Result<Vec<CalendarEvent>, ConfigError> {
        self.calendar
            .events
            .iter()
            .map(CalendarEventConfig::to_event)
            .collect()
    }
}
