use crate::domain::model::CheckReport;
use crate::domain::ports::Storage;
use crate::utils::error::{CheckError, Result};

/// Renders the report the way the original console check prints it: one block
/// per inbound, one ✓/✗ line per client.
pub fn render_text(report: &CheckReport) -> String {
    let mut lines = Vec::new();

    lines.push("=== Client Enable Status ===".to_string());
    lines.push(String::new());

    for inbound in &report.inbounds {
        let remark = if inbound.remark.is_empty() {
            "N/A"
        } else {
            inbound.remark.as_str()
        };
        lines.push(format!("Inbound #{} ({}):", inbound.id, remark));
        lines.push(format!("  ClientStats count: {}", inbound.clients.len()));

        if inbound.clients.is_empty() {
            lines.push("  (No ClientStats)".to_string());
        }

        for client in &inbound.clients {
            let status_icon = if client.enable { "✓" } else { "✗" };
            lines.push(format!(
                "  {} {}: enable={}, accountId={}",
                status_icon, client.email, client.enable, client.account_id
            ));
        }

        lines.push(String::new());
    }

    if !report.accounts.is_empty() {
        lines.push("Accounts:".to_string());
        for account in &report.accounts {
            let traffic = match &account.traffic {
                Some(t) => format!("up={} down={} total={}", t.up, t.down, t.total),
                None => "traffic unavailable".to_string(),
            };
            lines.push(format!(
                "  #{} {}: {} client(s), {}",
                account.id, account.name, account.client_count, traffic
            ));
        }
        lines.push(String::new());
    }

    if report.has_mismatches() {
        lines.push("⚠ Mismatches (expected disabled, still enabled):".to_string());
        for mismatch in &report.mismatches {
            let remark = if mismatch.remark.is_empty() {
                "N/A"
            } else {
                mismatch.remark.as_str()
            };
            lines.push(format!(
                "  ✗ {} on inbound #{} ({}), accountId={}",
                mismatch.email, mismatch.inbound_id, remark, mismatch.account_id
            ));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Checked {} inbound(s), {} client(s); {} mismatch(es)",
        report.inbounds.len(),
        report.client_count(),
        report.mismatches.len()
    ));

    lines.join("\n")
}

pub fn render_json(report: &CheckReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One CSV row per client, flat enough for spreadsheets and diffing.
pub fn render_csv(report: &CheckReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "inbound_id",
        "remark",
        "email",
        "enable",
        "account_id",
        "expected_disabled",
    ])?;

    for inbound in &report.inbounds {
        for client in &inbound.clients {
            writer.write_record([
                inbound.id.to_string(),
                inbound.remark.clone(),
                client.email.clone(),
                client.enable.to_string(),
                client.account_id.to_string(),
                client.expected_disabled.to_string(),
            ])?;
        }
    }

    let data = writer.into_inner().map_err(|e| CheckError::ReportError {
        message: format!("CSV buffer error: {}", e),
    })?;

    String::from_utf8(data).map_err(|e| CheckError::ReportError {
        message: format!("CSV output was not valid UTF-8: {}", e),
    })
}

pub struct ReportWriter<S: Storage> {
    storage: S,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes one file per requested format and returns the filenames written.
    pub async fn write(&self, report: &CheckReport, formats: &[String]) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in formats {
            let (filename, content) = match format.as_str() {
                "text" => ("report.txt", render_text(report)),
                "json" => ("report.json", render_json(report)?),
                "csv" => ("report.csv", render_csv(report)?),
                other => {
                    return Err(CheckError::InvalidConfigValueError {
                        field: "formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported report format".to_string(),
                    })
                }
            };

            self.storage.write_file(filename, content.as_bytes()).await?;
            tracing::debug!("Wrote {} ({} bytes)", filename, content.len());
            written.push(filename.to_string());
        }

        Ok(written)
    }
}
