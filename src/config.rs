//! Analysis configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::Severity;

pub const CONFIG_FILE_NAME: &str = ".stylecheck.json";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,

    /// Minimum severity to keep in results
    #[serde(default)]
    pub min_severity: MinSeverity,

    #[serde(default)]
    pub required_attribute: RequiredAttributeConfig,
}

/// Rule enable/disable filters; entries are rule ids or `*`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    #[serde(default = "default_enable")]
    pub enable: Vec<String>,

    #[serde(default)]
    pub disable: Vec<String>,
}

fn default_enable() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            disable: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinSeverity {
    #[default]
    Info,
    Warning,
    Error,
}

impl MinSeverity {
    pub fn to_severity(self) -> Severity {
        match self {
            MinSeverity::Info => Severity::Info,
            MinSeverity::Warning => Severity::Warning,
            MinSeverity::Error => Severity::Error,
        }
    }
}

/// Settings for the required-attribute rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredAttributeConfig {
    /// Fully qualified marker interface
    #[serde(default = "default_marker_interface")]
    pub marker_interface: String,

    /// Annotation class the rule (and its fix) require
    #[serde(default = "default_attribute_class")]
    pub attribute_class: String,
}

fn default_marker_interface() -> String {
    "Runtime.Contracts.INamedComponent".to_string()
}

fn default_attribute_class() -> String {
    "ComponentNameAttribute".to_string()
}

impl Default for RequiredAttributeConfig {
    fn default() -> Self {
        Self {
            marker_interface: default_marker_interface(),
            attribute_class: default_attribute_class(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Find `.stylecheck.json` in the given directory or any ancestor
    pub fn discover(start_dir: &Path) -> Option<Self> {
        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Self::from_file(&candidate).ok();
            }
            dir = current.parent();
        }
        None
    }

    /// Whether a rule id passes the enable/disable filters; `disable`
    /// takes precedence
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        let disabled = self
            .rules
            .disable
            .iter()
            .any(|p| p == "*" || p == rule_id);
        if disabled {
            return false;
        }
        self.rules.enable.iter().any(|p| p == "*" || p == rule_id)
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity.to_severity()
    }
}
