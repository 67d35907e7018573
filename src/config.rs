//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `ARGPS_*` environment variable overrides.

use crate::app::SessionOptions;
use crate::booking::CalendarPicker;
use crate::content::{Catalog, DailySelector, DEFAULT_ROLLOVER_HOUR};
use crate::notify::{EmailJsClient, EmailJsConfig, NotifyError};
use crate::profile::{
    FileProfileStore, MemoryProfileStore, ProfileRecord, ProfileStore, RestProfileStore,
    RestStoreConfig, StoreError, TriggerPolicy, DEFAULT_ACCESS_PASSWORD, DEFAULT_AVATAR_URL,
    DEFAULT_EMAIL,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub profile: ProfileDefaults,

    #[serde(default)]
    pub gate: TriggerPolicy,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// EmailJS relay configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_emailjs_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_service_id")]
    pub service_id: String,

    #[serde(default = "default_template_id")]
    pub template_id: String,

    #[serde(default = "default_public_key")]
    pub public_key: String,

    #[serde(default = "default_recipient_name")]
    pub recipient_name: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_emailjs_endpoint() -> String {
    EmailJsConfig::default().endpoint
}

fn default_service_id() -> String {
    EmailJsConfig::default().service_id
}

fn default_template_id() -> String {
    EmailJsConfig::default().template_id
}

fn default_public_key() -> String {
    EmailJsConfig::default().public_key
}

fn default_recipient_name() -> String {
    EmailJsConfig::default().recipient_name
}

fn default_request_timeout() -> u64 {
    10_000 // 10 seconds
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_emailjs_endpoint(),
            service_id: default_service_id(),
            template_id: default_template_id(),
            public_key: default_public_key(),
            recipient_name: default_recipient_name(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl NotifyConfig {
    pub fn to_emailjs(&self) -> EmailJsConfig {
        EmailJsConfig {
            endpoint: self.endpoint.clone(),
            service_id: self.service_id.clone(),
            template_id: self.template_id.clone(),
            public_key: self.public_key.clone(),
            recipient_name: self.recipient_name.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Where the profile record lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Rest,
    #[default]
    File,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" => Ok(StoreBackend::Rest),
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::Invalid(format!("unknown store backend: {}", other))),
        }
    }
}

/// Profile store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// PostgREST project URL (rest backend)
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_profile_id")]
    pub profile_id: i64,

    /// Directory for `profile.json` (file backend)
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_table() -> String {
    "profile".to_string()
}

fn default_profile_id() -> i64 {
    1
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("argps").to_string_lossy().to_string())
        .unwrap_or_else(|| "./argps_data".to_string())
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
            profile_id: default_profile_id(),
            data_dir: default_data_dir(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl StoreConfig {
    pub fn to_rest(&self) -> RestStoreConfig {
        RestStoreConfig {
            base_url: self.url.clone(),
            api_key: self.api_key.clone(),
            table: self.table.clone(),
            profile_id: self.profile_id,
            request_timeout_ms: self.request_timeout_ms,
        }
    }

    pub fn build(&self) -> Result<Arc<dyn ProfileStore>, StoreError> {
        let store: Arc<dyn ProfileStore> = match self.backend {
            StoreBackend::Rest => Arc::new(RestProfileStore::new(self.to_rest())?),
            StoreBackend::File => Arc::new(FileProfileStore::in_dir(
                &expand_home(&self.data_dir),
                self.profile_id,
            )),
            StoreBackend::Memory => Arc::new(MemoryProfileStore::new()),
        };
        tracing::debug!(backend = store.name(), "Profile store ready");
        Ok(store)
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Values for the profile record created on first run
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDefaults {
    #[serde(default = "default_email")]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default = "default_avatar")]
    pub avatar_image: String,

    #[serde(default = "default_access_password")]
    pub access_password: String,
}

fn default_email() -> String {
    DEFAULT_EMAIL.to_string()
}

fn default_avatar() -> String {
    DEFAULT_AVATAR_URL.to_string()
}

fn default_access_password() -> String {
    DEFAULT_ACCESS_PASSWORD.to_string()
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            email: default_email(),
            phone: String::new(),
            avatar_image: default_avatar(),
            access_password: default_access_password(),
        }
    }
}

impl ProfileDefaults {
    pub fn to_record(&self) -> ProfileRecord {
        ProfileRecord {
            email: self.email.clone(),
            phone: self.phone.clone(),
            avatar_image: self.avatar_image.clone(),
            access_password: self.access_password.clone(),
        }
        .with_password_fallback()
    }
}

/// Home screen content configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Local hour at which the daily content changes
    #[serde(default = "default_rollover_hour")]
    pub rollover_hour: u32,
}

fn default_rollover_hour() -> u32 {
    DEFAULT_ROLLOVER_HOUR
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            rollover_hour: default_rollover_hour(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// The first config file that exists is used; if it cannot be read or
    /// parsed the error is returned instead of falling back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("argps").join("config.toml")),
            Some(PathBuf::from("/etc/argps/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths, |key| std::env::var(key).ok())
    }

    /// Load the first existing file in `paths`, then apply overrides
    pub fn load_first<F>(paths: &[PathBuf], lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match paths.iter().find(|p| p.exists()) {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            None => {
                tracing::debug!("Using default config with environment overrides");
                Config::default()
            }
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Apply `ARGPS_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Store overrides
        if let Some(backend) = lookup("ARGPS_STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }
        if let Some(url) = lookup("ARGPS_STORE_URL") {
            self.store.url = url;
        }
        if let Some(key) = lookup("ARGPS_STORE_KEY") {
            self.store.api_key = key;
        }
        if let Some(data_dir) = lookup("ARGPS_DATA_DIR") {
            self.store.data_dir = data_dir;
        }

        // EmailJS overrides
        if let Some(service_id) = lookup("ARGPS_EMAILJS_SERVICE_ID") {
            self.notify.service_id = service_id;
        }
        if let Some(template_id) = lookup("ARGPS_EMAILJS_TEMPLATE_ID") {
            self.notify.template_id = template_id;
        }
        if let Some(public_key) = lookup("ARGPS_EMAILJS_PUBLIC_KEY") {
            self.notify.public_key = public_key;
        }

        // Gate override: "tap" or "hold:<secs>"
        if let Some(trigger) = lookup("ARGPS_GATE_TRIGGER") {
            self.gate = parse_trigger(&trigger)?;
        }

        // Logging overrides
        if let Some(level) = lookup("ARGPS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ARGPS_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    pub fn notifier(&self) -> Result<EmailJsClient, NotifyError> {
        EmailJsClient::new(self.notify.to_emailjs())
    }

    pub fn profile_store(&self) -> Result<Arc<dyn ProfileStore>, StoreError> {
        self.store.build()
    }

    pub fn session_options(&self, calendar: Option<CalendarPicker>) -> SessionOptions {
        SessionOptions {
            defaults: self.profile.to_record(),
            trigger: self.gate,
            selector: DailySelector::new(self.content.rollover_hour),
            catalog: Catalog::builtin(),
            calendar,
        }
    }
}

fn parse_trigger(s: &str) -> Result<TriggerPolicy, ConfigError> {
    let s = s.trim().to_ascii_lowercase();
    if s == "tap" {
        return Ok(TriggerPolicy::Tap);
    }
    match s.strip_prefix("hold:").map(|secs| secs.parse::<u64>()) {
        Some(Ok(hold_secs)) => Ok(TriggerPolicy::Hold { hold_secs }),
        _ => Err(ConfigError::Invalid(format!(
            "gate trigger must be \"tap\" or \"hold:<secs>\", got {:?}",
            s
        ))),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# ARGPS Configuration
#
# Environment variables override these settings:
# - ARGPS_STORE_BACKEND, ARGPS_STORE_URL, ARGPS_STORE_KEY
# - ARGPS_DATA_DIR
# - ARGPS_EMAILJS_SERVICE_ID, ARGPS_EMAILJS_TEMPLATE_ID, ARGPS_EMAILJS_PUBLIC_KEY
# - ARGPS_GATE_TRIGGER ("tap" or "hold:<secs>")
# - ARGPS_LOG_LEVEL
# - ARGPS_LOG_FORMAT

[notify]
# EmailJS send endpoint and template
endpoint = "https://api.emailjs.com/api/v1.0/email/send"
service_id = "service_p4rnj4d"
template_id = "template_j21xpja"
public_key = "MFNYuDPIGgrfQhb5C"

# Name shown as the recipient of booking emails
recipient_name = "Rithanya Gopinathan"

# Request timeout (ms)
request_timeout_ms = 10000

[store]
# Profile backend: rest, file or memory
backend = "file"

# PostgREST project URL and anon key (rest backend)
url = ""
api_key = ""
table = "profile"
profile_id = 1

# Directory for profile.json (file backend)
data_dir = "~/.local/share/argps"

request_timeout_ms = 10000

[profile]
# Values for the record created on first run
email = "rithanya@example.com"
phone = ""
access_password = "argps2025"

[gate]
# Gesture that opens the admin password prompt: "tap" or "hold"
trigger = "tap"
# hold_secs = 3

[content]
# Local hour at which the daily tip changes
rollover_hour = 7

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
