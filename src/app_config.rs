use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{AppError, ConfigError};
use crate::exemption::ExemptionPolicy;
use crate::scanner::Rewriter;
use crate::substitution::Substituter;

/// Application configuration module
/// This module handles loading and validating the word pair, the plural
/// suffix and the set of exempt element categories.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Word searched for, matched case-insensitively as a whole word
    #[serde(default = "default_target_word")]
    pub target_word: String,

    /// Word written in place of every match
    #[serde(default = "default_replacement_word")]
    pub replacement_word: String,

    /// Single trailing character that marks the plural form
    #[serde(default = "default_plural_suffix")]
    pub plural_suffix: char,

    /// Tag names whose subtrees are never rewritten
    #[serde(default = "default_exempt_tags")]
    pub exempt_tags: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_word() -> String {
    "balaklava".to_string()
}

fn default_replacement_word() -> String {
    "baklava".to_string()
}

fn default_plural_suffix() -> char {
    's'
}

fn default_exempt_tags() -> Vec<String> {
    ["SCRIPT", "STYLE", "NOSCRIPT", "INPUT", "TEXTAREA", "CODE", "PRE"]
        .iter()
        .map(|tag| tag.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_word: default_target_word(),
            replacement_word: default_replacement_word(),
            plural_suffix: default_plural_suffix(),
            exempt_tags: default_exempt_tags(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from a JSON string; absent fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::File(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Ok(Self::from_json_str(&content)?)
    }

    /// Validate the configuration by building the engine it describes
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rewriter().map(|_| ())
    }

    /// Build the matcher/replacer for this configuration
    pub fn substituter(&self) -> Result<Substituter, ConfigError> {
        Substituter::new(&self.target_word, &self.replacement_word, self.plural_suffix)
    }

    /// Build the exemption policy for this configuration
    pub fn exemption_policy(&self) -> Result<ExemptionPolicy, ConfigError> {
        if self.exempt_tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(ConfigError::EmptyExemptTag);
        }
        Ok(ExemptionPolicy::from_tag_names(self.exempt_tags.iter().map(String::as_str)))
    }

    /// Build the complete rewriter used by the scanner and the watcher
    pub fn rewriter(&self) -> Result<Rewriter, ConfigError> {
        Ok(Rewriter::new(self.substituter()?, self.exemption_policy()?))
    }
}
