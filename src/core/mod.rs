pub mod check;
pub mod client;
pub mod report;

pub use crate::domain::model::{CheckReport, Inbound, Record};
pub use crate::domain::ports::{PanelApi, Storage};
pub use crate::utils::error::Result;
