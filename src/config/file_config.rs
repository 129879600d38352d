use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{
    validate_allowed_values, validate_non_empty_string, validate_positive_number, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ALLOWED_FORMATS: &[&str] = &["text", "json", "csv"];

/// TOML configuration for a check run. Every section mirrors a CLI flag group;
/// CLI flags win over file values when both are given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub panel: PanelSection,
    pub check: Option<CheckSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSection {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSection {
    /// Account ids whose clients are expected to be disabled.
    pub expect_disabled: Option<Vec<i64>>,
    pub check_accounts: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub formats: Option<Vec<String>>,
}

impl CheckConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::IoError)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders with environment values. Unset variables
    /// are left as-is so validation can surface them with context.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for CheckConfig {
    fn validate(&self) -> Result<()> {
        validate_url("panel.base_url", &self.panel.base_url)?;

        if let Some(username) = &self.panel.username {
            validate_non_empty_string("panel.username", username)?;
        }
        if let Some(password) = &self.panel.password {
            validate_non_empty_string("panel.password", password)?;
        }
        if let Some(timeout) = self.panel.timeout_seconds {
            validate_positive_number("panel.timeout_seconds", timeout, 1)?;
        }

        if let Some(output) = &self.output {
            if let Some(formats) = &output.formats {
                validate_allowed_values("output.formats", formats, ALLOWED_FORMATS)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_config_parsing() {
        let toml_content = r#"
[panel]
base_url = "http://localhost:2053"
username = "admin"
password = "admin"
timeout_seconds = 10

[check]
expect_disabled = [1, 7]
check_accounts = true

[output]
path = "./report"
formats = ["text", "json"]
"#;

        let config = CheckConfig::from_str(toml_content).unwrap();
        assert_eq!(config.panel.base_url, "http://localhost:2053");
        assert_eq!(config.panel.username.as_deref(), Some("admin"));
        let check = config.check.as_ref().unwrap();
        assert_eq!(check.expect_disabled.as_deref(), Some(&[1, 7][..]));
        assert_eq!(check.check_accounts, Some(true));
        let output = config.output.as_ref().unwrap();
        assert_eq!(output.formats.as_ref().unwrap().len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PANEL_CHECK_TEST_PASSWORD", "s3cret");

        let toml_content = r#"
[panel]
base_url = "http://localhost:2053"
password = "${PANEL_CHECK_TEST_PASSWORD}"
"#;

        let config = CheckConfig::from_str(toml_content).unwrap();
        assert_eq!(config.panel.password.as_deref(), Some("s3cret"));

        std::env::remove_var("PANEL_CHECK_TEST_PASSWORD");
    }

    #[test]
    fn test_unset_env_var_left_in_place() {
        let toml_content = r#"
[panel]
base_url = "http://localhost:2053"
password = "${PANEL_CHECK_TEST_UNSET_VAR}"
"#;

        let config = CheckConfig::from_str(toml_content).unwrap();
        assert_eq!(
            config.panel.password.as_deref(),
            Some("${PANEL_CHECK_TEST_UNSET_VAR}")
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let toml_content = r#"
[panel]
base_url = "ftp://example.com"
"#;

        let config = CheckConfig::from_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let toml_content = r#"
[panel]
base_url = "http://localhost:2053"

[output]
formats = ["xml"]
"#;

        let config = CheckConfig::from_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }
}
