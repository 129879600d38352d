use crate::config::Settings;
use crate::domain::model::{
    AccountSummary, CheckReport, ClientStatus, InboundSummary, Mismatch,
};
use crate::domain::ports::PanelApi;
use crate::utils::error::Result;
use chrono::Utc;
use std::collections::HashSet;

/// Runs the enable-status check against an authenticated panel session and
/// produces a report. Owns no state beyond the run's options.
pub struct EnableChecker<A: PanelApi> {
    api: A,
    username: String,
    password: String,
    expect_disabled: HashSet<i64>,
    check_accounts: bool,
}

impl<A: PanelApi> EnableChecker<A> {
    pub fn new(api: A, settings: &Settings) -> Self {
        Self {
            api,
            username: settings.username.clone(),
            password: settings.password.clone(),
            expect_disabled: settings.expect_disabled.iter().copied().collect(),
            check_accounts: settings.check_accounts,
        }
    }

    pub async fn run(&self) -> Result<CheckReport> {
        tracing::info!("🔐 Logging in as {}", self.username);
        self.api.login(&self.username, &self.password).await?;
        tracing::info!("✓ Login successful");

        let inbounds = self.api.list_inbounds().await?;
        tracing::info!("✓ Received {} inbounds from API", inbounds.len());

        let mut summaries = Vec::new();
        let mut mismatches = Vec::new();

        for inbound in &inbounds {
            let mut clients = Vec::new();

            for stats in &inbound.client_stats {
                let expected_disabled = self.expect_disabled.contains(&stats.account_id);

                if expected_disabled && stats.enable {
                    mismatches.push(Mismatch {
                        inbound_id: inbound.id,
                        remark: inbound.remark.clone(),
                        email: stats.email.clone(),
                        account_id: stats.account_id,
                    });
                }

                clients.push(ClientStatus {
                    email: stats.email.clone(),
                    enable: stats.enable,
                    account_id: stats.account_id,
                    expected_disabled,
                });
            }

            summaries.push(InboundSummary {
                id: inbound.id,
                remark: inbound.remark.clone(),
                clients,
            });
        }

        let accounts = if self.check_accounts {
            self.collect_accounts().await?
        } else {
            Vec::new()
        };

        if !mismatches.is_empty() {
            tracing::warn!(
                "⚠ {} client(s) expected disabled but still enabled",
                mismatches.len()
            );
        }

        Ok(CheckReport {
            generated_at: Utc::now(),
            inbounds: summaries,
            accounts,
            mismatches,
        })
    }

    async fn collect_accounts(&self) -> Result<Vec<AccountSummary>> {
        let records = self.api.list_accounts().await?;
        tracing::info!("✓ Received {} accounts from API", records.len());

        let mut summaries = Vec::new();
        for record in records {
            let id = match record.data.get("id").and_then(|v| v.as_i64()) {
                Some(id) => id,
                None => {
                    tracing::warn!("Skipping account record without a numeric id");
                    continue;
                }
            };

            let name = record
                .data
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("N/A")
                .to_string();

            let clients = self.api.account_clients(id).await?;
            let traffic = self.api.account_traffic(id).await?;

            summaries.push(AccountSummary {
                id,
                name,
                client_count: clients.len(),
                traffic: Some(traffic),
            });
        }

        Ok(summaries)
    }
}
