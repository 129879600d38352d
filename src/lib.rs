pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, CliConfig, Settings};
pub use crate::core::check::EnableChecker;
pub use crate::core::client::PanelClient;
pub use crate::core::report::ReportWriter;
pub use crate::utils::error::{CheckError, Result};
