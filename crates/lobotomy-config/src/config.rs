// crates/lobotomy-config/src/config.rs
// ============================================================================
// Module: Lobotomy Configuration
// Description: The clients/session document and its file loading.
// Purpose: Turn serialized configuration into typed, validated settings.
// Dependencies: lobotomy-core, serde, serde_json, serde_yaml, toml, tracing
// ============================================================================

//! ## Overview
//! The configuration document has two parts. `clients` maps a service name to
//! method names to a configured response; a response that is an array is a
//! sequence of responses consumed in order. `session` (or, when absent,
//! `sessions`) configures the values reported by mocked sessions; either key
//! takes one mapping or a list consumed one entry per session.
//!
//! Security posture: configuration files are bounded by
//! [`MAX_CONFIG_FILE_SIZE`] and must be UTF-8.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lobotomy_core::ServiceName;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::session::SessionConfig;
use crate::session::SessionSettings;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Prefix
// ============================================================================

/// Location of the Lobotomy document inside a larger configuration value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigPrefix {
    /// The document is the whole value.
    #[default]
    None,
    /// Dot-separated key path, for example `tools.lobotomy`.
    Dotted(String),
    /// Explicit key sequence.
    Keys(Vec<String>),
}

impl ConfigPrefix {
    /// Returns the key segments to descend through.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::None => Vec::new(),
            Self::Dotted(path) => path.split('.').filter(|segment| !segment.is_empty()).collect(),
            Self::Keys(keys) => keys.iter().map(String::as_str).collect(),
        }
    }

    /// Selects the prefixed value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a segment is missing or a parent
    /// is not a mapping.
    pub fn select<'a>(&self, value: &'a Value) -> Result<&'a Value, ConfigError> {
        let mut current = value;
        let mut walked: Vec<&str> = Vec::new();
        for key in self.keys() {
            walked.push(key);
            current = current.as_object().and_then(|map| map.get(key)).ok_or_else(|| {
                ConfigError::Invalid(format!("missing config prefix segment: {}", walked.join(".")))
            })?;
        }
        Ok(current)
    }
}

impl From<&str> for ConfigPrefix {
    fn from(path: &str) -> Self {
        if path.is_empty() { Self::None } else { Self::Dotted(path.to_string()) }
    }
}

impl From<Vec<String>> for ConfigPrefix {
    fn from(keys: Vec<String>) -> Self {
        Self::Keys(keys)
    }
}

// ============================================================================
// SECTION: Format
// ============================================================================

/// Serialized configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
    /// TOML document.
    Toml,
}

impl ConfigFormat {
    /// Selects a format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Parses text in this format into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is malformed.
    pub fn parse(self, text: &str) -> Result<Value, ConfigError> {
        match self {
            Self::Json => {
                serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            Self::Yaml => {
                if text.trim().is_empty() {
                    return Ok(Value::Null);
                }
                serde_yaml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            Self::Toml => {
                let table: toml::Table =
                    toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
                Ok(toml_to_json(toml::Value::Table(table)))
            }
        }
    }
}

/// Converts a TOML value; datetimes become their string form.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(number) => Value::Number(number.into()),
        toml::Value::Float(number) => Number::from_f64(number).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table.into_iter().map(|(key, value)| (key, toml_to_json(value))).collect::<Map<_, _>>(),
        ),
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Parsed Lobotomy configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LobotomyConfig {
    /// Configured responses: service, then method, then response.
    #[serde(default)]
    pub clients: BTreeMap<ServiceName, BTreeMap<String, Value>>,
    /// Session settings; takes precedence over `sessions`.
    #[serde(default)]
    pub session: Option<SessionSettings>,
    /// Session settings used when `session` is absent.
    #[serde(default)]
    pub sessions: Option<SessionSettings>,
}

impl LobotomyConfig {
    /// Builds a configuration from an already parsed value.
    ///
    /// A null document (or prefixed value) yields the empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the prefix is missing or the document is
    /// malformed.
    pub fn from_value(value: &Value, prefix: &ConfigPrefix) -> Result<Self, ConfigError> {
        let selected = prefix.select(value)?;
        if selected.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_value(selected.clone())
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration text in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_text(
        text: &str,
        format: ConfigFormat,
        prefix: &ConfigPrefix,
    ) -> Result<Self, ConfigError> {
        let value = format.parse(text)?;
        Self::from_value(&value, prefix)
    }

    /// Loads configuration from a file, choosing the parser by extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is too large, has
    /// an unknown extension, or fails to parse.
    pub fn load(path: &Path, prefix: &ConfigPrefix) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            ConfigError::Invalid(format!("unsupported config file extension: {}", path.display()))
        })?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_text(content, format, prefix)?;
        debug!(
            path = %path.display(),
            services = config.clients.len(),
            "loaded lobotomy config"
        );
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for empty service or method names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (service, methods) in &self.clients {
            if service.as_str().trim().is_empty() {
                return Err(ConfigError::Invalid("client service name is empty".to_string()));
            }
            if methods.keys().any(|method| method.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "client {service} has an empty method name"
                )));
            }
        }
        Ok(())
    }

    /// Returns the session settings for the next created session.
    ///
    /// `session` wins when present, otherwise `sessions` is used. A single
    /// mapping repeats for every session and a list is consumed from the
    /// front. With neither, or once a list drains, defaults apply.
    pub fn next_session(&mut self) -> SessionConfig {
        self.session
            .as_mut()
            .or(self.sessions.as_mut())
            .map(SessionSettings::next)
            .unwrap_or_default()
    }

    /// Iterates configured responses as `(service, method, response)`.
    pub fn responses(&self) -> impl Iterator<Item = (&ServiceName, &str, &Value)> {
        self.clients.iter().flat_map(|(service, methods)| {
            methods.iter().map(move |(method, response)| (service, method.as_str(), response))
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// Parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}
