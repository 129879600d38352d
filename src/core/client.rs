use crate::domain::model::{AccountTraffic, ApiResponse, Inbound, Record};
use crate::domain::ports::PanelApi;
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Authenticated HTTP session against one panel instance. Login stores the
/// session cookie in the underlying client; every later call rides on it.
pub struct PanelClient {
    base_url: Url,
    client: Client,
}

impl PanelClient {
    const LOGIN: &'static str = "login";
    const INBOUND_LIST: &'static str = "panel/api/inbounds/list";
    const ACCOUNT_LIST: &'static str = "panel/api/account/list";

    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        // Panels redirect to the login page on expired sessions; a trailing
        // slash keeps Url::join from eating the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// GET an endpoint and unwrap the panel's `{ success, msg, obj }` envelope.
    async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(CheckError::UnexpectedStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ApiResponse<T> = response.json().await?;
        if !body.success {
            return Err(CheckError::ApiFailure {
                endpoint: path.to_string(),
                message: body.msg,
            });
        }

        Ok(body.obj)
    }

    fn records_from(values: Vec<serde_json::Value>) -> Vec<Record> {
        values.into_iter().filter_map(Record::from_value).collect()
    }
}

#[async_trait]
impl PanelApi for PanelClient {
    async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = self.endpoint(Self::LOGIN)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CheckError::LoginFailed {
                status: status.as_u16(),
            });
        }

        // The panel answers 200 even for bad credentials and signals the
        // outcome in the body.
        let body: ApiResponse<serde_json::Value> = response.json().await?;
        if !body.success {
            return Err(CheckError::LoginRejected { message: body.msg });
        }

        Ok(())
    }

    async fn list_inbounds(&self) -> Result<Vec<Inbound>> {
        let inbounds: Option<Vec<Inbound>> = self.get_envelope(Self::INBOUND_LIST).await?;
        Ok(inbounds.unwrap_or_default())
    }

    async fn list_accounts(&self) -> Result<Vec<Record>> {
        let accounts: Option<Vec<serde_json::Value>> =
            self.get_envelope(Self::ACCOUNT_LIST).await?;
        Ok(Self::records_from(accounts.unwrap_or_default()))
    }

    async fn account_traffic(&self, account_id: i64) -> Result<AccountTraffic> {
        let path = format!("panel/api/account/{}/traffic", account_id);
        let traffic: Option<AccountTraffic> = self.get_envelope(&path).await?;
        traffic.ok_or_else(|| CheckError::ApiFailure {
            endpoint: path,
            message: "empty traffic object".to_string(),
        })
    }

    async fn account_clients(&self, account_id: i64) -> Result<Vec<Record>> {
        let path = format!("panel/api/account/{}/clients", account_id);
        let clients: Option<Vec<serde_json::Value>> = self.get_envelope(&path).await?;
        Ok(Self::records_from(clients.unwrap_or_default()))
    }
}
