use crate::domain::model::{AccountTraffic, Inbound, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The panel's HTTP API, as consumed by the checker. The panel is a black box;
/// implementations only need to honor the documented response shapes.
#[async_trait]
pub trait PanelApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<()>;
    async fn list_inbounds(&self) -> Result<Vec<Inbound>>;
    async fn list_accounts(&self) -> Result<Vec<Record>>;
    async fn account_traffic(&self, account_id: i64) -> Result<AccountTraffic>;
    async fn account_clients(&self, account_id: i64) -> Result<Vec<Record>>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
