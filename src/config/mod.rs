pub mod cli;
pub mod file_config;

use crate::config::file_config::{CheckConfig, ALLOWED_FORMATS};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_allowed_values, validate_non_empty_string, validate_positive_number, validate_url,
    Validate,
};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "panel-check")]
#[command(about = "Check the per-client enable status reported by a panel API")]
pub struct CliConfig {
    /// Panel base URL, e.g. http://localhost:2053
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Optional TOML configuration file; CLI flags override file values
    #[arg(long)]
    pub config: Option<String>,

    /// Account ids whose clients are expected to be disabled
    #[arg(long, value_delimiter = ',')]
    pub expect_disabled: Vec<i64>,

    /// Also fetch the account list and per-account traffic
    #[arg(long)]
    pub check_accounts: bool,

    /// Directory to write report files into
    #[arg(long)]
    pub output_path: Option<String>,

    /// Report formats to write: text, json, csv
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

/// Effective settings for one run, after merging CLI flags over the optional
/// configuration file and applying defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub expect_disabled: Vec<i64>,
    pub check_accounts: bool,
    pub output_path: Option<String>,
    pub formats: Vec<String>,
    pub timeout_seconds: u64,
}

impl Settings {
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let config = CheckConfig::from_file(path)?;
                config.validate()?;
                Some(config)
            }
            None => None,
        };

        let panel = file.as_ref().map(|f| &f.panel);
        let check = file.as_ref().and_then(|f| f.check.as_ref());
        let output = file.as_ref().and_then(|f| f.output.as_ref());

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| panel.map(|p| p.base_url.clone()))
            .unwrap_or_else(|| "http://localhost:2053".to_string());

        let username = cli
            .username
            .clone()
            .or_else(|| panel.and_then(|p| p.username.clone()))
            .unwrap_or_else(|| "admin".to_string());

        let password = cli
            .password
            .clone()
            .or_else(|| panel.and_then(|p| p.password.clone()))
            .unwrap_or_else(|| "admin".to_string());

        let timeout_seconds = cli
            .timeout_seconds
            .or_else(|| panel.and_then(|p| p.timeout_seconds))
            .unwrap_or(30);

        let expect_disabled = if !cli.expect_disabled.is_empty() {
            cli.expect_disabled.clone()
        } else {
            check
                .and_then(|c| c.expect_disabled.clone())
                .unwrap_or_default()
        };

        let check_accounts =
            cli.check_accounts || check.and_then(|c| c.check_accounts).unwrap_or(false);

        let output_path = cli
            .output_path
            .clone()
            .or_else(|| output.and_then(|o| o.path.clone()));

        let formats = if !cli.formats.is_empty() {
            cli.formats.clone()
        } else {
            output
                .and_then(|o| o.formats.clone())
                .unwrap_or_else(|| vec!["json".to_string()])
        };

        Ok(Settings {
            base_url,
            username,
            password,
            expect_disabled,
            check_accounts,
            output_path,
            formats,
            timeout_seconds,
        })
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_non_empty_string("username", &self.username)?;
        validate_non_empty_string("password", &self.password)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_allowed_values("formats", &self.formats, ALLOWED_FORMATS)?;
        Ok(())
    }
}
