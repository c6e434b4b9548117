use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

pub const LOG_DIR_ENV: &str = "PICKSCOPE_LOG_DIR";
pub const LOG_FILTER_ENV: &str = "PICKSCOPE_LOG";

/// Server settings.
///
/// Layered lowest to highest: built-in defaults, environment, the client's
/// `initializationOptions`, command-line flags. Every field has a default so
/// partial JSON is accepted at each layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub log_dir: PathBuf,
    pub log_filter: String,
    pub diagnostics: DiagnosticsConfig,
    pub completion: CompletionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    /// Reported as the diagnostic's `source`.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionConfig {
    /// Offer identifiers found in the current document.
    pub document_identifiers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_filter: "info".to_string(),
            diagnostics: DiagnosticsConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source: "pickbasic".to_string(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            document_identifiers: true,
        }
    }
}

/// `~/.pickscope/logs`, or `./.pickscope/logs` when there is no home.
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pickscope")
        .join("logs")
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(LOG_DIR_ENV).filter(|v| !v.is_empty()) {
            self.log_dir = PathBuf::from(dir);
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV).filter(|v| !v.is_empty()) {
            self.log_filter = filter;
        }
        self
    }

    /// Overlays a (possibly partial) JSON object, e.g. `initializationOptions`.
    /// `null` leaves the configuration untouched.
    pub fn merge_json(&mut self, overrides: &Value) -> Result<()> {
        if overrides.is_null() {
            return Ok(());
        }
        let mut base = serde_json::to_value(&*self)?;
        merge_values(&mut base, overrides);
        *self = serde_json::from_value(base)?;
        Ok(())
    }
}

fn merge_values(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(config.diagnostics.enabled);
        assert_eq!(config.diagnostics.source, "pickbasic");
        assert!(config.completion.document_identifiers);
        assert!(config.log_dir.ends_with(".pickscope/logs"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::default().with_env(|key| match key {
            LOG_DIR_ENV => Some("/tmp/pick-logs".to_string()),
            LOG_FILTER_ENV => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.log_dir, PathBuf::from("/tmp/pick-logs"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let config = Config::default().with_env(|_| Some(String::new()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_json_only_touches_named_fields() {
        let mut config = Config::default();
        config
            .merge_json(&json!({ "diagnostics": { "source": "mvbasic" } }))
            .unwrap();
        assert_eq!(config.diagnostics.source, "mvbasic");
        assert!(config.diagnostics.enabled);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn null_overrides_are_ignored() {
        let mut config = Config::default();
        config.merge_json(&Value::Null).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn wrongly_typed_overrides_are_rejected() {
        let mut config = Config::default();
        let err = config
            .merge_json(&json!({ "completion": { "documentIdentifiers": "yes" } }))
            .unwrap_err();
        assert!(matches!(err, crate::error::PickscopeError::Json(_)));
    }
}
