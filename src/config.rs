use crate::error::{PullError, Result};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://app.tolgee.io";
pub const DEFAULT_OUTPUT_PATH: &str = "src/i18n/resources.ts";

/// Options for a single pull run.
///
/// Built once at process entry and passed into the pipeline. Nothing below
/// `main` reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    // Tolgee
    pub api_key: String,
    pub api_url: String,

    // Export filters
    pub languages: Vec<String>,
    pub namespaces: Vec<String>,
    pub default_namespace: Option<String>,

    // Output
    pub output_path: PathBuf,
    pub split: bool,
}

impl Config {
    /// Check the options before any network activity.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(PullError::configuration(
                "API key not set (use --api-key or TOLGEE_API_KEY)",
            ));
        }

        if self.api_url.trim().is_empty() {
            return Err(PullError::configuration("API URL must not be empty"));
        }

        if self.namespaces.is_empty() {
            return Err(PullError::configuration(
                "at least one namespace is required (use --namespaces or TOLGEE_NAMESPACES)",
            ));
        }

        if let Some(default_namespace) = self.default_namespace() {
            if !self.namespaces.iter().any(|ns| ns == default_namespace) {
                return Err(PullError::configuration(format!(
                    "default namespace '{}' is not one of the requested namespaces ({})",
                    default_namespace,
                    self.namespaces.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// The default namespace, with a blank value treated as unset.
    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
    }
}

/// Split a comma separated list, dropping blanks.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            api_key: "tgpak_test".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            languages: vec!["en".to_string(), "de".to_string()],
            namespaces: vec!["common".to_string(), "messages".to_string()],
            default_namespace: Some("common".to_string()),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            split: false,
        }
    }

    // ==================== validate Tests ====================

    #[test]
    fn test_valid_config() {
        assert!(create_test_config().validate().is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = create_test_config();
        config.api_key = "  ".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, PullError::Configuration(_)));
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_empty_api_url() {
        let mut config = create_test_config();
        config.api_url = String::new();

        assert!(matches!(
            config.validate(),
            Err(PullError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_namespaces() {
        let mut config = create_test_config();
        config.namespaces.clear();
        config.default_namespace = None;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("namespace"));
    }

    #[test]
    fn test_default_namespace_not_requested() {
        let mut config = create_test_config();
        config.default_namespace = Some("errors".to_string());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'errors'"));
        assert!(err.to_string().contains("common, messages"));
    }

    #[test]
    fn test_no_default_namespace_is_valid() {
        let mut config = create_test_config();
        config.default_namespace = None;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_languages_is_valid() {
        let mut config = create_test_config();
        config.languages.clear();

        assert!(config.validate().is_ok());
    }

    // ==================== default_namespace Tests ====================

    #[test]
    fn test_blank_default_namespace_is_unset() {
        let mut config = create_test_config();
        config.default_namespace = Some("   ".to_string());

        assert_eq!(config.default_namespace(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_namespace_trimmed() {
        let mut config = create_test_config();
        config.default_namespace = Some(" common ".to_string());

        assert_eq!(config.default_namespace(), Some("common"));
    }

    // ==================== parse_list Tests ====================

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("en, de ,fr"), vec!["en", "de", "fr"]);
    }

    #[test]
    fn test_parse_list_drops_blanks() {
        assert_eq!(parse_list("en,,  ,de,"), vec!["en", "de"]);
        assert!(parse_list("").is_empty());
    }
}
