use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{I18nError, Result};

/// Settings for a validation or gap-filling run.
///
/// Loaded from an optional JSON file; every field has a default so a partial
/// file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default = "CheckConfig::default_locales_dir")]
    pub locales_dir: PathBuf,
    #[serde(default = "CheckConfig::default_base_locale")]
    pub base_locale: String,
    /// Restrict the run to these locales. Empty means every discovered locale.
    #[serde(default)]
    pub locales: Vec<String>,
    /// Extra keys are only reported under these prefixes.
    #[serde(default = "CheckConfig::default_sensitive_prefixes")]
    pub sensitive_prefixes: Vec<String>,
    #[serde(default = "CheckConfig::default_check_placeholders")]
    pub check_placeholders: bool,
    /// Treat placeholder mismatches and empty values as failures.
    #[serde(default)]
    pub strict: bool,
}

impl CheckConfig {
    fn default_locales_dir() -> PathBuf {
        PathBuf::from("locales")
    }

    fn default_base_locale() -> String {
        "en".to_string()
    }

    fn default_sensitive_prefixes() -> Vec<String> {
        ["tables.", "figures.", "labels.", "headings.", "sections.", "series."]
            .into_iter()
            .map(String::from)
            .collect()
    }

    const fn default_check_placeholders() -> bool {
        true
    }

    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`I18nError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| I18nError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| I18nError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    #[must_use]
    pub fn with_locales_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.locales_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_base_locale(mut self, locale: impl Into<String>) -> Self {
        self.base_locale = locale.into();
        self
    }

    /// Whether `locale` takes part in this run as a target.
    #[must_use]
    pub fn includes_locale(&self, locale: &str) -> bool {
        locale != self.base_locale
            && (self.locales.is_empty() || self.locales.iter().any(|l| l == locale))
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            locales_dir: Self::default_locales_dir(),
            base_locale: Self::default_base_locale(),
            locales: Vec::new(),
            sensitive_prefixes: Self::default_sensitive_prefixes(),
            check_placeholders: Self::default_check_placeholders(),
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CheckConfig::from_json("{}").unwrap();
        assert_eq!(config, CheckConfig::default());
        assert_eq!(config.base_locale, "en");
        assert!(config.sensitive_prefixes.contains(&"tables.".to_string()));
        assert!(config.check_placeholders);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = CheckConfig::from_json(
            r#"{ "base_locale": "de", "sensitive_prefixes": ["kpis."], "strict": true }"#,
        )
        .unwrap();
        assert_eq!(config.base_locale, "de");
        assert_eq!(config.sensitive_prefixes, vec!["kpis.".to_string()]);
        assert!(config.strict);
        assert_eq!(config.locales_dir, PathBuf::from("locales"));
    }

    #[test]
    fn includes_locale_skips_base_and_honours_allowlist() {
        let mut config = CheckConfig::default();
        assert!(config.includes_locale("de"));
        assert!(!config.includes_locale("en"));
        config.locales = vec!["fr".to_string()];
        assert!(!config.includes_locale("de"));
        assert!(config.includes_locale("fr"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let path = std::env::temp_dir().join("bizplan-i18n-missing-config.json");
        let err = CheckConfig::load(&path).unwrap_err();
        assert!(matches!(err, I18nError::Config { .. }));
        assert!(err.is_fatal());
    }
}
